//! HTML views for Quire.
//!
//! Pages are assembled from inline constants and small builder functions —
//! no template engine for a handful of forms and one listing. Anything
//! that originated as user input (filenames, document content, usernames)
//! goes through [`escape_html`] before it is embedded.

use axum::response::Html;

/// Shared page head: doctype, viewport, and the stylesheet.
const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Quire</title>
<style>
body{font-family:system-ui,sans-serif;max-width:640px;margin:2rem auto;padding:0 1rem;line-height:1.5}
header{display:flex;justify-content:space-between;align-items:baseline;border-bottom:1px solid #ddd;margin-bottom:1rem}
ul.documents{list-style:none;padding:0}
ul.documents li{display:flex;gap:.5rem;align-items:baseline;padding:.25rem 0}
form.inline{display:inline;margin:0}
p.flash{background:#fdf6d8;border:1px solid #e8d58a;padding:.5rem .75rem;border-radius:4px}
textarea{width:100%;font-family:monospace}
label{display:block;margin:.5rem 0}
</style></head>
<body>
"#;

/// Escape the five HTML-significant characters.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode a document name for use in a path.
fn href(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Wrap a page body in the shared chrome: head, flash, signed-in status.
fn layout(flash: Option<&str>, user: Option<&str>, body: &str) -> Html<String> {
    let mut page = String::with_capacity(PAGE_HEAD.len() + body.len() + 512);
    page.push_str(PAGE_HEAD);

    page.push_str("<header><h1><a href=\"/\">Quire</a></h1><div>");
    match user {
        Some(user) => {
            page.push_str(&format!(
                "<span class=\"user_status\">Signed in as {}.</span> \
                 <form class=\"inline\" action=\"/users/signout\" method=\"post\">\
                 <button type=\"submit\">Sign Out</button></form>",
                escape_html(user)
            ));
        }
        None => {
            page.push_str("<a class=\"user_status\" href=\"/users/signin\">Sign In</a>");
        }
    }
    page.push_str("</div></header>\n");

    if let Some(message) = flash {
        page.push_str(&format!("<p class=\"flash\">{}</p>\n", escape_html(message)));
    }

    page.push_str(body);
    page.push_str("\n</body></html>\n");
    Html(page)
}

/// The document listing page.
pub fn index_page(flash: Option<&str>, user: Option<&str>, names: &[String]) -> Html<String> {
    let mut body = String::from("<ul class=\"documents\">\n");
    for name in names {
        let enc = href(name);
        let esc = escape_html(name);
        body.push_str(&format!(
            "<li><a href=\"/{enc}\">{esc}</a> \
             <a href=\"/{enc}/edit\">edit</a> \
             <form class=\"inline\" action=\"/{enc}/delete\" method=\"post\">\
             <button type=\"submit\">delete</button></form> \
             <form class=\"inline\" action=\"/{enc}/duplicate\" method=\"post\">\
             <button type=\"submit\">duplicate</button></form></li>\n"
        ));
    }
    body.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>");
    layout(flash, user, &body)
}

/// The create-document form.
pub fn new_document_page(flash: Option<&str>, user: Option<&str>) -> Html<String> {
    let body = "<h2>Add a new document:</h2>\n\
        <form action=\"/new\" method=\"post\">\n\
        <input name=\"filename\" autofocus/>\n\
        <button type=\"submit\">Create</button>\n\
        </form>";
    layout(flash, user, body)
}

/// The edit form, pre-filled with the document's current content.
pub fn edit_document_page(
    flash: Option<&str>,
    user: Option<&str>,
    name: &str,
    content: &str,
) -> Html<String> {
    let body = format!(
        "<h2>Edit content of {}:</h2>\n\
         <form action=\"/{}/edit\" method=\"post\">\n\
         <textarea name=\"contents\" rows=\"20\">{}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n\
         </form>",
        escape_html(name),
        href(name),
        escape_html(content)
    );
    layout(flash, user, &body)
}

/// The sign-in form. `flash` carries both redirect flashes and the inline
/// "Invalid credentials" message on a failed attempt.
pub fn signin_page(flash: Option<&str>, user: Option<&str>, username: &str) -> Html<String> {
    let body = format!(
        "<h2>Sign In</h2>\n\
         <form action=\"/users/signin\" method=\"post\">\n\
         <label>Username <input name=\"username\" value=\"{}\" autofocus/></label>\n\
         <label>Password <input type=\"password\" name=\"password\"/></label>\n\
         <button type=\"submit\">Sign In</button>\n\
         </form>\n\
         <p><a href=\"/users/register\">Register a new account</a></p>",
        escape_html(username)
    );
    layout(flash, user, &body)
}

/// The registration form.
pub fn register_page(flash: Option<&str>, user: Option<&str>) -> Html<String> {
    let body = "<h2>Register</h2>\n\
        <form action=\"/users/register\" method=\"post\">\n\
        <label>Username <input name=\"username\" autofocus/></label>\n\
        <label>Password <input type=\"password\" name=\"password\"/></label>\n\
        <button type=\"submit\">Register</button>\n\
        </form>";
    layout(flash, user, body)
}

/// The catch-all 404 page.
pub fn not_found_page() -> Html<String> {
    layout(None, None, "<h2>Nothing here.</h2>\n<p><a href=\"/\">Back to the listing.</a></p>")
}

/// The generic 500 page. Deliberately detail-free — the reason is logged,
/// not shown.
pub fn error_page() -> Html<String> {
    layout(
        None,
        None,
        "<h2>Something went wrong.</h2>\n<p><a href=\"/\">Back to the listing.</a></p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b attr="a&b">'"#),
            "&lt;b attr=&quot;a&amp;b&quot;&gt;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn index_lists_documents_with_controls() {
        let names = vec!["about.md".to_owned(), "history.txt".to_owned()];
        let Html(page) = index_page(None, None, &names);
        assert!(page.contains("href=\"/about.md\""));
        assert!(page.contains("href=\"/history.txt\""));
        assert!(page.contains("/about.md/delete"));
        assert!(page.contains("/about.md/duplicate"));
    }

    #[test]
    fn layout_shows_signed_in_user() {
        let Html(page) = index_page(None, Some("admin"), &[]);
        assert!(page.contains("Signed in as admin."));
        assert!(page.contains("/users/signout"));
    }

    #[test]
    fn layout_shows_sign_in_link_when_anonymous() {
        let Html(page) = index_page(None, None, &[]);
        assert!(page.contains("<a class=\"user_status\" href=\"/users/signin\">"));
    }

    #[test]
    fn flash_is_rendered_escaped() {
        let Html(page) = index_page(Some("<script> has been created."), None, &[]);
        assert!(page.contains("&lt;script&gt; has been created."));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn edit_page_escapes_document_content() {
        let Html(page) = edit_document_page(None, Some("admin"), "a.md", "</textarea><img>");
        assert!(page.contains("Edit content of a.md:"));
        assert!(page.contains("&lt;/textarea&gt;&lt;img&gt;"));
    }
}
