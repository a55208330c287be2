//! Example: drive a storefront page headlessly
//!
//! `cargo run -p mall-runtime --example walkthrough -- page.html`
//! Set `RUST_LOG=mall_page=debug,mall_runtime=trace` for the full event log.

use mall_dom::DOMRect;
use mall_page::PageConfig;
use mall_runtime::Window;
use tracing_subscriber::EnvFilter;

const FALLBACK_PAGE: &str = r##"
<div id="loader"><div class="loader-progress"></div></div>
<nav id="navbar"><a class="nav-link" href="#home">Accueil</a></nav>
<section id="home"><p id="open-status"></p></section>
<div id="christmas-popup"><button id="popup-close">×</button></div>
"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let html = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => FALLBACK_PAGE.to_string(),
    };

    let mut window = Window::from_html(&html);
    if window.exists("#home")? {
        window.set_layout("#home", DOMRect::from_xywh(0.0, 0.0, 1280.0, 3000.0))?;
    }
    window.boot(PageConfig::default());

    println!("requested: {:?}", window.requested_urls());
    window.advance_time(5300)?;
    println!("loader hidden: {}", window.exists("#loader.hidden")?);
    println!("popup shown: {}", window.exists("#christmas-popup.active")?);
    if window.exists("#open-status")? {
        println!("status: {:?}", window.inner_html_of("#open-status")?);
    }

    window.scroll_window(600.0);
    println!("navbar scrolled: {}", window.exists("#navbar.scrolled")?);
    Ok(())
}
