use crate::css::classes;

use super::element::Element;

/// Title shown above the list of problems
pub const ERROR_TITLE: &str = "Chatterbox error";

/// Draw the error box shown in place of a transcript that failed to parse
#[must_use]
pub fn render_errors<S: AsRef<str>>(errors: &[S]) -> Element {
    let mut items = Element::new("ul").with_class(classes::ERROR_ITEMS);
    for error in errors {
        items.push(Element::new("li").with_text(error.as_ref()));
    }

    let mut container = Element::div(classes::ERROR_CONTAINER);
    container.push(Element::div(classes::ERROR_TITLE).with_text(ERROR_TITLE));
    container.push(items);

    let mut root = Element::div(classes::ROOT);
    root.push(container);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_title_and_items() {
        let html = render_errors(&["Frontmatter is not valid YAML.", "a < b"]).to_html();
        assert_eq!(
            html,
            "<div class=\"chatterbox\"><div class=\"error-container\">\
             <div class=\"error-title\">Chatterbox error</div>\
             <ul class=\"error-items\"><li>Frontmatter is not valid YAML.</li>\
             <li>a &lt; b</li></ul></div></div>"
        );
    }

    #[test]
    fn empty_list_still_has_title() {
        let root = render_errors::<String>(&[]);
        let items = root.find_by_class(classes::ERROR_ITEMS).unwrap();
        assert!(items.children().is_empty());
        assert_eq!(root.text_content(), ERROR_TITLE);
    }
}
