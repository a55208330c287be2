//! Storefront fixture shared by the runtime integration tests

#![allow(dead_code)]

use mall_dom::DOMRect;
use mall_page::PageConfig;
use mall_runtime::{SessionStorage, Window, WindowOptions};
use tracing_subscriber::EnvFilter;

pub const STOREFRONT: &str = r##"
<!DOCTYPE html>
<html lang="fr">
<head><title>Boutique</title></head>
<body>
    <div id="loader"><div class="loader-progress"></div></div>

    <nav id="navbar">
        <a href="#" id="logo-link">Boutique</a>
        <button id="nav-toggle"><span></span></button>
        <ul id="nav-menu">
            <li><a class="nav-link" href="#home">Accueil</a></li>
            <li><a class="nav-link" href="#collections">Collections</a></li>
            <li><a class="nav-link" href="#showcase">Vidéos</a></li>
            <li><a class="nav-link" href="#about">À propos</a></li>
            <li><a class="nav-link" href="#contact">Contact</a></li>
        </ul>
    </nav>

    <section id="home">
        <video id="hero-video" autoplay muted loop><source src="assets/hero bg.mp4"></video>
        <div class="section-header" id="home-header"><h1>Nouvelle collection</h1></div>
        <a href="#contact" id="cta-link" class="cta-button">Nous trouver</a>
    </section>

    <section id="collections">
        <div class="section-header" id="collections-header"><h2>Collections</h2></div>
        <div class="filters">
            <button class="filter-btn active" id="filter-all" data-filter="all">Tout</button>
            <button class="filter-btn" id="filter-women" data-filter="women">Femme</button>
            <button class="filter-btn" id="filter-men" data-filter="men">Homme</button>
        </div>
        <div class="product-card" id="card-1" data-category="women"></div>
        <div class="product-card" id="card-2" data-category="men"></div>
        <div class="product-card" id="card-3" data-category="women"></div>
        <img class="lazy" id="lazy-a" data-src="assets/products/robe.jpg" alt="Robe">
    </section>

    <section id="showcase">
        <div class="video-card" id="video-card-1">
            <video class="showcase-video" id="showcase-1" muted loop><source src="assets/look1.mp4"></video>
            <button class="play-btn" id="play-1"><i class="fas fa-play"></i></button>
        </div>
    </section>

    <section id="about">
        <div class="section-header" id="about-header"><h2>À propos</h2></div>
        <div class="about-video"><video id="about-video" muted><source src="assets/about us.mp4"></video></div>
        <video id="lazy-video" data-lazy-video muted><source data-src="assets/collection.mp4"></video>
        <img data-lazy id="lazy-b" data-src="assets/products/veste.jpg" alt="Veste">
    </section>

    <section id="contact">
        <p id="open-status"></p>
        <button id="back-to-top">↑</button>
    </section>

    <div id="christmas-popup" class="popup-overlay">
        <div class="popup-content" id="popup-content">
            <button id="popup-close">×</button>
            <p>Offre de Noël</p>
        </div>
    </div>
</body>
</html>
"##;

/// Document boxes for a 1280x800 viewport; the page is 4000px tall
pub const LAYOUT: &[(&str, [f64; 4])] = &[
    ("#navbar", [0.0, 0.0, 1280.0, 80.0]),
    ("#loader", [0.0, 0.0, 1280.0, 800.0]),
    ("#home", [0.0, 0.0, 1280.0, 800.0]),
    ("#home-header", [0.0, 100.0, 1280.0, 100.0]),
    ("#collections", [0.0, 800.0, 1280.0, 800.0]),
    ("#collections-header", [0.0, 850.0, 1280.0, 60.0]),
    ("#card-1", [0.0, 950.0, 400.0, 300.0]),
    ("#card-2", [400.0, 950.0, 400.0, 300.0]),
    ("#card-3", [800.0, 950.0, 400.0, 300.0]),
    ("#lazy-a", [0.0, 1300.0, 400.0, 200.0]),
    ("#showcase", [0.0, 1600.0, 1280.0, 800.0]),
    ("#video-card-1", [0.0, 1700.0, 600.0, 400.0]),
    ("#about", [0.0, 2400.0, 1280.0, 800.0]),
    ("#about-header", [0.0, 2450.0, 1280.0, 50.0]),
    ("#lazy-video", [0.0, 2600.0, 600.0, 400.0]),
    ("#lazy-b", [700.0, 2600.0, 400.0, 300.0]),
    ("#contact", [0.0, 3200.0, 1280.0, 800.0]),
];

pub fn storefront() -> Window {
    storefront_with(WindowOptions::default(), SessionStorage::new())
}

/// `RUST_LOG=mall_runtime=trace cargo test` shows the event log of failing tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn storefront_with(options: WindowOptions, session: SessionStorage) -> Window {
    init_tracing();
    let mut window = Window::from_html(STOREFRONT)
        .with_options(options)
        .with_session(session);
    for (selector, [x, y, w, h]) in LAYOUT {
        window
            .set_layout(selector, DOMRect::from_xywh(*x, *y, *w, *h))
            .unwrap();
    }
    window
}

/// Laid-out storefront with every behavior wired
pub fn booted() -> Window {
    let mut window = storefront();
    window.boot(PageConfig::default());
    window
}
