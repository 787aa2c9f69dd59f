/**
 * Markup Parser Tests
 *
 * Tree building, entity decoding, raw text, and diagnostics.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize, parse_fragment, row};
    use shadow_view::markup::{parse, ParseOptions};

    fn parse_errors(source: &str) -> Vec<String> {
        parse(source, "test.html", &ParseOptions::default())
            .errors
            .into_iter()
            .map(|e| e.msg)
            .collect()
    }

    mod tree {
        use super::*;

        #[test]
        fn should_build_nested_elements() {
            let (doc, root) = parse_fragment("<div><p>a<b>b</b></p><!--c--></div>");
            assert_eq!(
                humanize(&doc, root),
                vec![
                    row("Element", "div", 0),
                    row("Element", "p", 1),
                    row("Text", "a", 2),
                    row("Element", "b", 2),
                    row("Text", "b", 3),
                    row("Comment", "c", 1),
                ]
            );
        }

        #[test]
        fn should_keep_attribute_order_and_values() {
            let (doc, root) = parse_fragment("<input type='text' value=\"x\" disabled data-k=v>");
            let attrs: Vec<(String, String)> = doc
                .attributes(root)
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect();
            assert_eq!(
                attrs,
                vec![
                    ("type".to_string(), "text".to_string()),
                    ("value".to_string(), "x".to_string()),
                    ("disabled".to_string(), String::new()),
                    ("data-k".to_string(), "v".to_string()),
                ]
            );
        }

        #[test]
        fn should_not_give_void_elements_children() {
            let (doc, root) = parse_fragment("<p>a<br>b<img src=x>c</p>");
            assert_eq!(doc.children(root).len(), 5);
            assert_eq!(doc.to_html(root), "<p>a<br>b<img src=\"x\">c</p>");
        }

        #[test]
        fn should_accept_self_closing_tags() {
            let (doc, root) = parse_fragment("<div><span/><i /></div>");
            assert_eq!(doc.to_html(root), "<div><span></span><i></i></div>");
        }

        #[test]
        fn should_read_raw_text_verbatim() {
            let (doc, root) = parse_fragment("<div><script>if (a < b && c) {}</script></div>");
            let script = doc.children(root)[0];
            assert_eq!(doc.text_content(script), "if (a < b && c) {}");
            assert_eq!(
                doc.to_html(root),
                "<div><script>if (a < b && c) {}</script></div>"
            );
        }

        #[test]
        fn should_decode_entities_in_escapable_raw_text() {
            let (doc, root) = parse_fragment("<textarea>&lt;b&gt; <i></textarea>");
            assert_eq!(doc.text_content(root), "<b> <i>");
        }

        #[test]
        fn should_ignore_doctype() {
            let result = parse("<!DOCTYPE html><p>x</p>", "test.html", &ParseOptions::default());
            assert!(result.errors.is_empty());
            assert_eq!(result.root_nodes.len(), 1);
        }
    }

    mod text {
        use super::*;

        #[test]
        fn should_decode_entities_in_text_and_attributes() {
            let (doc, root) =
                parse_fragment("<p title=\"a &amp; b\">&lt;x&gt; &#65;&#x42; &unknown;</p>");
            assert_eq!(doc.attribute(root, "title"), Some("a & b"));
            assert_eq!(doc.text_content(root), "<x> AB &unknown;");
        }

        #[test]
        fn should_escape_on_serialization() {
            let (doc, root) = parse_fragment("<p title=\"&quot;q&quot;\">1 &lt; 2 &amp; 3</p>");
            assert_eq!(
                doc.to_html(root),
                "<p title=\"&quot;q&quot;\">1 &lt; 2 &amp; 3</p>"
            );
        }

        #[test]
        fn should_drop_whitespace_only_text_by_default() {
            let (doc, root) = parse_fragment("<ul>\n  <li>a b</li>\n  <li> </li>\n</ul>");
            assert_eq!(
                humanize(&doc, root),
                vec![
                    row("Element", "ul", 0),
                    row("Element", "li", 1),
                    row("Text", "a b", 2),
                    row("Element", "li", 1),
                ]
            );
        }

        #[test]
        fn should_keep_whitespace_inside_pre() {
            let (doc, root) = parse_fragment("<pre>  </pre>");
            assert_eq!(doc.text_content(root), "  ");
        }

        #[test]
        fn should_preserve_whitespace_on_request() {
            let options = ParseOptions {
                preserve_whitespace: true,
            };
            let result = parse("<ul>\n  <li>a</li>\n</ul>", "test.html", &options);
            let ul = result.root_nodes[0];
            assert_eq!(result.document.children(ul).len(), 3);
        }

        #[test]
        fn should_normalize_line_endings() {
            let (doc, root) = parse_fragment("<p>a\r\nb\rc</p>");
            assert_eq!(doc.text_content(root), "a\nb\nc");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_unexpected_closing_tags() {
            assert_eq!(parse_errors("<div></span></div>"), vec!["Unexpected closing tag \"span\""]);
        }

        #[test]
        fn should_report_void_end_tags() {
            assert_eq!(
                parse_errors("<p><br></br></p>"),
                vec!["Void elements do not have end tags \"br\""]
            );
        }

        #[test]
        fn should_report_unclosed_elements() {
            assert_eq!(parse_errors("<div><p>x</div>"), vec!["Unclosed element \"p\""]);
            assert_eq!(parse_errors("<section>"), vec!["Unclosed element \"section\""]);
        }

        #[test]
        fn should_report_unterminated_constructs() {
            assert_eq!(parse_errors("<p>x</p><!-- open"), vec!["Unterminated comment"]);
            assert!(parse_errors("<p title=\"x></p>").contains(&"Unterminated attribute value".to_string()));
        }

        #[test]
        fn should_locate_errors() {
            let result = parse("<div>\n  </span>\n</div>", "card.html", &ParseOptions::default());
            assert_eq!(result.errors.len(), 1);
            let error = &result.errors[0];
            assert_eq!(error.span.start.line, 1);
            assert_eq!(error.span.start.col, 2);
            assert_eq!(error.span.start.to_string(), "card.html@1:2");
            assert!(error.contextual_message().contains("[ERROR ->]</span>"));
        }
    }
}
