//! Parsing and querying a storefront-shaped page

use mall_dom::{DOMRect, ElementGeometry, HtmlParser, ReadyState};
use pretty_assertions::assert_eq;

const PAGE: &str = r##"
<!DOCTYPE html>
<html>
<body>
    <nav id="navbar">
        <button id="nav-toggle"></button>
        <ul id="nav-menu">
            <li><a class="nav-link" href="#home">Accueil</a></li>
            <li><a class="nav-link" href="#collections">Collections</a></li>
        </ul>
    </nav>
    <section id="home"><video autoplay muted><source src="assets/hero bg.mp4"></video></section>
    <section id="collections">
        <button class="filter-btn active" data-filter="all">Tout</button>
        <button class="filter-btn" data-filter="women">Femme</button>
        <div class="product-card" data-category="women"></div>
        <div class="product-card" data-category="men"></div>
        <img class="lazy" data-src="assets/a.jpg">
        <img data-lazy data-src="assets/b.jpg">
    </section>
</body>
</html>
"##;

#[test]
fn test_storefront_queries() {
    let doc = HtmlParser::new().parse(PAGE);

    assert_eq!(doc.query_selector_all("section[id]").unwrap().len(), 2);
    assert_eq!(doc.query_selector_all(".nav-link").unwrap().len(), 2);
    assert_eq!(doc.query_selector_all("img.lazy, img[data-lazy]").unwrap().len(), 2);

    let women = doc.select_one(r#".filter-btn[data-filter="women"]"#).unwrap();
    assert_eq!(doc.text_content(women), "Femme");

    let source = doc
        .select_one(r#"video source[src="assets/hero bg.mp4"]"#)
        .unwrap();
    let video = doc.tree().parent(source).unwrap();
    assert_eq!(doc.media(video).map(|m| m.ready_state), Some(ReadyState::HaveNothing));
}

#[test]
fn test_menu_containment() {
    let doc = HtmlParser::new().parse(PAGE);
    let menu = doc.get_element_by_id("nav-menu").unwrap();
    let link = doc.select_one(".nav-link").unwrap();
    let toggle = doc.get_element_by_id("nav-toggle").unwrap();

    assert!(doc.tree().contains(menu, link));
    assert!(!doc.tree().contains(menu, toggle));
}

#[test]
fn test_content_height_tracks_geometry() {
    let mut doc = HtmlParser::new().parse(PAGE);
    let home = doc.get_element_by_id("home").unwrap();
    let collections = doc.get_element_by_id("collections").unwrap();
    doc.set_geometry(home, ElementGeometry::from_rect(DOMRect::from_xywh(0.0, 0.0, 1280.0, 800.0)))
        .unwrap();
    doc.set_geometry(
        collections,
        ElementGeometry::from_rect(DOMRect::from_xywh(0.0, 800.0, 1280.0, 1200.0)),
    )
    .unwrap();

    assert_eq!(doc.content_height(), 2000.0);
}
