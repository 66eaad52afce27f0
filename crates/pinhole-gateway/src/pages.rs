//! Server-rendered HTML pages.

use maud::{html, Markup, DOCTYPE};

const PAGE_CSS: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;max-width:640px;margin:2rem auto;padding:0 1rem;color:#111;line-height:1.5}
label{display:block;margin:.6rem 0 .2rem}
input[type=text],input[type=number],input[type=password]{width:100%;padding:.35rem;box-sizing:border-box}
button{margin-top:1rem;padding:.4rem 1rem}
.error{color:#a00}
"#;

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (maud::PreEscaped(PAGE_CSS)) }
            }
            body { (body) }
        }
    }
}

pub fn home() -> Markup {
    layout(
        "Pinhole",
        html! {
            h2 { "Pinhole URL shortener" }
            p { "Short links with optional passwords, expiry dates, click limits and device or country targeting." }
            p { a href="/shorten" { "Shorten a URL" } }
        },
    )
}

pub fn shorten_form() -> Markup {
    layout(
        "Shorten a URL",
        html! {
            h2 { "URL Shortener with Optional Premium Features" }
            form method="POST" action="/shorten" {
                label for="long_url" { "Long URL" }
                input type="text" id="long_url" name="long_url" size="50" required;
                label for="custom_id" { "Custom ID (optional)" }
                input type="text" id="custom_id" name="custom_id" size="20";
                label for="password" { "Password (optional)" }
                input type="text" id="password" name="password" size="20";
                label for="expiry_date" { "Expiry Date (YYYY-MM-DD HH:MM:SS, optional)" }
                input type="text" id="expiry_date" name="expiry_date" size="25";
                label for="max_clicks" { "Max Clicks (optional)" }
                input type="number" id="max_clicks" name="max_clicks" min="1";
                label for="mobile_url" { "Mobile Redirect URL (optional)" }
                input type="text" id="mobile_url" name="mobile_url" size="50";
                label for="desktop_url" { "Desktop Redirect URL (optional)" }
                input type="text" id="desktop_url" name="desktop_url" size="50";
                label for="country_redirect" { "Country Redirect (format: US=https://us.site.com;IN=https://in.site.com)" }
                input type="text" id="country_redirect" name="country_redirect" size="60";
                button type="submit" { "Shorten URL" }
            }
        },
    )
}

pub fn created(short_url: &str, qr_url: &str, warnings: &[String]) -> Markup {
    layout(
        "Short URL created",
        html! {
            h3 { "Short URL created" }
            p { a href=(short_url) { (short_url) } }
            @for warning in warnings {
                p.error { (warning) }
            }
            p { img src=(qr_url) alt="QR code" width="200"; }
            p { a href="/shorten" { "Shorten another" } }
        },
    )
}

pub fn password_prompt() -> Markup {
    layout(
        "Password required",
        html! {
            h3 { "Password required" }
            form method="POST" {
                label for="password" { "Password" }
                input type="password" id="password" name="password";
                button type="submit" { "Submit" }
            }
        },
    )
}

pub fn error(message: &str) -> Markup {
    layout(
        "Error",
        html! {
            h3.error { "Error: " (message) }
        },
    )
}

pub fn method_not_allowed() -> Markup {
    layout(
        "Method not allowed",
        html! {
            h3.error { "405 Method Not Allowed" }
            p { "This endpoint does not support the requested HTTP method." }
            p { a href="/" { "Back to home" } }
        },
    )
}
