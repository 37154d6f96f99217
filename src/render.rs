//! Server-side page rendering.

use crate::cover;
use crate::db::{Author, Book};
use crate::error::Result;

/// A page to render: a template name and its parameters.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    /// Home page with recently added books.
    Home {
        /// Books to show, newest first.
        books: &'a [Book],
    },
    /// Book search results.
    BookIndex {
        /// Matching books.
        books: &'a [Book],
        /// Echoed `title` filter.
        title: &'a str,
        /// Echoed `publishedBefore` filter.
        published_before: &'a str,
        /// Echoed `publishedAfter` filter.
        published_after: &'a str,
    },
    /// Book creation form.
    BookNew {
        /// Book values to prefill.
        book: &'a Book,
        /// Authors for the selection control.
        authors: &'a [Author],
        /// Error banner.
        error: Option<&'a str>,
    },
    /// Book edit form.
    BookEdit {
        /// Book being edited.
        book: &'a Book,
        /// Authors for the selection control.
        authors: &'a [Author],
        /// Error banner.
        error: Option<&'a str>,
    },
    /// Book detail.
    BookShow {
        /// The book.
        book: &'a Book,
        /// Its resolved author, if it still exists.
        author: Option<&'a Author>,
        /// Error banner.
        error: Option<&'a str>,
    },
    /// Author search results.
    AuthorIndex {
        /// Matching authors.
        authors: &'a [Author],
        /// Echoed `name` filter.
        name: &'a str,
    },
    /// Author creation form.
    AuthorNew {
        /// Author values to prefill.
        author: &'a Author,
        /// Error banner.
        error: Option<&'a str>,
    },
    /// Author edit form.
    AuthorEdit {
        /// Author being edited.
        author: &'a Author,
        /// Error banner.
        error: Option<&'a str>,
    },
    /// Author detail with their books.
    AuthorShow {
        /// The author.
        author: &'a Author,
        /// Books referencing the author.
        books: &'a [Book],
    },
}

impl Page<'_> {
    /// Template name, used for logging.
    pub fn template(&self) -> &'static str {
        match self {
            Page::Home { .. } => "index",
            Page::BookIndex { .. } => "books/index",
            Page::BookNew { .. } => "books/new",
            Page::BookEdit { .. } => "books/edit",
            Page::BookShow { .. } => "books/show",
            Page::AuthorIndex { .. } => "authors/index",
            Page::AuthorNew { .. } => "authors/new",
            Page::AuthorEdit { .. } => "authors/edit",
            Page::AuthorShow { .. } => "authors/show",
        }
    }
}

/// Turns pages into HTML documents.
pub trait Renderer: Send + Sync {
    /// Render `page` to a complete document.
    fn render(&self, page: &Page<'_>) -> Result<String>;
}

/// Plain HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_title: String,
}

impl HtmlRenderer {
    /// Create a renderer using `site_title` in the header of every page.
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    fn layout(&self, heading: &str, error: Option<&str>, body: &str) -> String {
        let error_banner = error
            .map(|e| format!(r#"<div class="error">{}</div>"#, escape_html(e)))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{heading} - {site}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 900px; margin: 2rem auto; padding: 0 1rem; }}
        nav a {{ margin-right: 1rem; }}
        .error {{ background: #fde2e2; color: #8a1f1f; padding: 0.75rem; border-radius: 6px; margin: 1rem 0; }}
        .grid {{ display: flex; flex-wrap: wrap; gap: 1rem; }}
        .cover {{ width: 150px; height: 225px; object-fit: cover; background: #eee; }}
        label {{ display: block; margin-top: 0.75rem; }}
    </style>
</head>
<body>
    <nav>
        <a href="/"><strong>{site}</strong></a>
        <a href="/authors">Authors</a>
        <a href="/authors/new">Add Author</a>
        <a href="/books">Books</a>
        <a href="/books/new">Add Book</a>
    </nav>
    <h1>{heading}</h1>
    {error_banner}
    {body}
</body>
</html>"#,
            heading = escape_html(heading),
            site = escape_html(&self.site_title),
        )
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page<'_>) -> Result<String> {
        let html = match *page {
            Page::Home { books } => self.layout("Recently Added", None, &book_grid(books)),
            Page::BookIndex {
                books,
                title,
                published_before,
                published_after,
            } => {
                let body = format!(
                    r#"<form action="/books" method="GET">
        <label>Title <input type="text" name="title" value="{title}"></label>
        <label>Published After <input type="date" name="publishedAfter" value="{after}"></label>
        <label>Published Before <input type="date" name="publishedBefore" value="{before}"></label>
        <button type="submit">Search</button>
    </form>
    {grid}"#,
                    title = escape_html(title),
                    after = escape_html(published_after),
                    before = escape_html(published_before),
                    grid = book_grid(books),
                );
                self.layout("Search Books", None, &body)
            }
            Page::BookNew {
                book,
                authors,
                error,
            } => self.layout(
                "New Book",
                error,
                &book_form("/books", book, authors, "Create"),
            ),
            Page::BookEdit {
                book,
                authors,
                error,
            } => {
                let action = format!("/books/{}?_method=PUT", book.id);
                self.layout("Edit Book", error, &book_form(&action, book, authors, "Update"))
            }
            Page::BookShow {
                book,
                author,
                error,
            } => self.layout(&book.title, error, &book_detail(book, author)),
            Page::AuthorIndex { authors, name } => {
                let mut body = format!(
                    r#"<form action="/authors" method="GET">
        <label>Name <input type="text" name="name" value="{}"></label>
        <button type="submit">Search</button>
    </form>
    <ul>"#,
                    escape_html(name)
                );
                for author in authors {
                    body.push_str(&format!(
                        r#"<li><a href="/authors/{}">{}</a></li>"#,
                        author.id,
                        escape_html(&author.name)
                    ));
                }
                body.push_str("</ul>");
                self.layout("Search Authors", None, &body)
            }
            Page::AuthorNew { author, error } => {
                self.layout("New Author", error, &author_form("/authors", author, "Create"))
            }
            Page::AuthorEdit { author, error } => {
                let action = format!("/authors/{}?_method=PUT", author.id);
                self.layout("Edit Author", error, &author_form(&action, author, "Update"))
            }
            Page::AuthorShow { author, books } => {
                let body = format!(
                    r#"<p>
        <a href="/authors/{id}/edit">Edit</a>
        <form action="/authors/{id}?_method=DELETE" method="POST" style="display:inline">
            <button type="submit">Delete</button>
        </form>
    </p>
    <h2>Books by Author</h2>
    {grid}"#,
                    id = author.id,
                    grid = book_grid(books),
                );
                self.layout(&author.name, None, &body)
            }
        };

        Ok(html)
    }
}

fn book_grid(books: &[Book]) -> String {
    if books.is_empty() {
        return "<p>No books found.</p>".to_string();
    }

    let mut html = String::from(r#"<div class="grid">"#);
    for book in books {
        html.push_str(&format!(
            r#"<a href="/books/{id}">{cover}<div>{title}</div></a>"#,
            id = book.id,
            cover = cover_img(book),
            title = escape_html(&book.title),
        ));
    }
    html.push_str("</div>");
    html
}

fn cover_img(book: &Book) -> String {
    match cover::data_url(book) {
        Some(src) => format!(r#"<img class="cover" src="{}" alt="">"#, src),
        None => r#"<div class="cover"></div>"#.to_string(),
    }
}

fn book_detail(book: &Book, author: Option<&Author>) -> String {
    let author_link = match author {
        Some(a) => format!(r#"<a href="/authors/{}">{}</a>"#, a.id, escape_html(&a.name)),
        None => "Unknown author".to_string(),
    };
    let published = book
        .publish_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let pages = book.page_count.map(|p| p.to_string()).unwrap_or_default();

    format!(
        r#"{cover}
    <dl>
        <dt>Author</dt><dd>{author}</dd>
        <dt>Publish Date</dt><dd>{published}</dd>
        <dt>Page Count</dt><dd>{pages}</dd>
        <dt>Description</dt><dd>{description}</dd>
    </dl>
    <p>
        <a href="/books/{id}/edit">Edit</a>
        <form action="/books/{id}?_method=DELETE" method="POST" style="display:inline">
            <button type="submit">Delete</button>
        </form>
    </p>"#,
        cover = cover_img(book),
        author = author_link,
        description = escape_html(&book.description),
        id = book.id,
    )
}

fn book_form(action: &str, book: &Book, authors: &[Author], submit: &str) -> String {
    let mut options = String::new();
    for author in authors {
        let selected = if author.id == book.author_id {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            author.id,
            selected,
            escape_html(&author.name)
        ));
    }

    let published = book
        .publish_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let pages = book.page_count.map(|p| p.to_string()).unwrap_or_default();

    format!(
        r#"<form action="{action}" method="POST">
        <label>Title <input type="text" name="title" value="{title}"></label>
        <label>Author <select name="author">{options}</select></label>
        <label>Publish Date <input type="date" name="publishDate" value="{published}"></label>
        <label>Page Count <input type="number" name="pageCount" min="1" value="{pages}"></label>
        <label>Cover <input type="file" accept="image/jpeg,image/png,image/gif" id="cover-file"></label>
        <input type="hidden" name="cover" id="cover">
        <label>Description <textarea name="description">{description}</textarea></label>
        <button type="submit">{submit}</button>
    </form>
    <script>
        document.getElementById('cover-file').addEventListener('change', function (e) {{
            const file = e.target.files[0];
            if (!file) return;
            const reader = new FileReader();
            reader.onload = function () {{
                const data = reader.result.split(',')[1];
                document.getElementById('cover').value = JSON.stringify({{ type: file.type, data: data }});
            }};
            reader.readAsDataURL(file);
        }});
    </script>"#,
        action = escape_html(action),
        title = escape_html(&book.title),
        description = escape_html(&book.description),
    )
}

fn author_form(action: &str, author: &Author, submit: &str) -> String {
    format!(
        r#"<form action="{action}" method="POST">
        <label>Name <input type="text" name="name" value="{name}"></label>
        <button type="submit">{submit}</button>
    </form>"#,
        action = escape_html(action),
        name = escape_html(&author.name),
    )
}

/// Escape text for inclusion in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
