/**
 * Iteration Tests
 *
 * Sequence assignment to iteration properties regenerates one child instance
 * per element under the region's anchor.
 */

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use shadow_view::{Component, ComponentRegistry, Error, GenericComponent, Instance, Template};
    use std::sync::Arc;

    const LIST: &str = concat!(
        "<div>",
        "<h2>${title}</h2>",
        "<ul><li data-repeat=\"items\" class=\"${kind}\">${label}</li></ul>",
        "</div>"
    );

    fn instantiate(source: &str, data: Option<Value>) -> Instance {
        Template::new(source)
            .compile_view(None, data.as_ref())
            .expect("instance")
    }

    mod replace {
        use super::*;

        #[test]
        fn should_generate_one_child_per_element_in_order() {
            let mut instance = instantiate(LIST, None);
            instance
                .set("items", json!([{"label": "x", "kind": "a"}, {"label": "y"}]))
                .unwrap();

            let children = instance.children("items");
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].get("label"), Some(&json!("x")));
            assert_eq!(children[1].get("label"), Some(&json!("y")));
            assert_eq!(
                instance.render(),
                r#"<div><h2></h2><ul><li class="a">x</li><li class="">y</li></ul></div>"#
            );
        }

        #[test]
        fn should_replace_all_previous_children() {
            let mut instance = instantiate(LIST, None);
            instance.set("items", json!([{"label": "x"}, {"label": "y"}])).unwrap();
            let live_before = instance.dom().borrow().len();

            instance.set("items", json!([{"label": "z"}])).unwrap();

            assert_eq!(instance.children("items").len(), 1);
            assert_eq!(instance.children("items")[0].get("label"), Some(&json!("z")));
            assert_eq!(
                instance.render(),
                r#"<div><h2></h2><ul><li class="">z</li></ul></div>"#
            );
            // Each generated <li> holds the element and one bound text node.
            assert_eq!(instance.dom().borrow().len(), live_before - 2);
        }

        #[test]
        fn should_clear_on_empty_sequence() {
            let mut instance = instantiate(LIST, Some(json!({"items": [{"label": "x"}]})));
            instance.set("items", json!([])).unwrap();
            assert!(instance.children("items").is_empty());
            assert_eq!(instance.render(), "<div><h2></h2><ul></ul></div>");
            assert_eq!(instance.get("items"), Some(&json!([])));
        }

        #[test]
        fn should_append_after_existing_anchor_content() {
            let instance = instantiate(
                r#"<ul><li>head</li><li data-repeat="items">${@}</li><li>tail</li></ul>"#,
                Some(json!({"items": ["a", "b"]})),
            );
            assert_eq!(
                instance.render(),
                "<ul><li>head</li><li>tail</li><li>a</li><li>b</li></ul>"
            );
        }

        #[test]
        fn should_notify_the_iteration_property() {
            let mut instance = instantiate(LIST, None);
            instance.set("items", json!([])).unwrap();
            let component = instance.downcast::<GenericComponent>().unwrap();
            assert_eq!(component.last_change(), Some(Some("items")));
        }
    }

    mod invalid {
        use super::*;

        #[test]
        fn should_ignore_non_sequence_values() {
            let mut instance = instantiate(LIST, Some(json!({"items": [{"label": "x"}]})));
            let rendered = instance.render();

            let changes = instance.downcast::<GenericComponent>().unwrap().change_count();

            for value in [json!("nope"), json!({"label": "y"}), json!(3), json!(null)] {
                assert!(instance.set("items", value).is_ok());
                assert_eq!(instance.render(), rendered);
            }

            let component = instance.downcast::<GenericComponent>().unwrap();
            assert_eq!(component.change_count(), changes);
            assert_eq!(instance.children("items").len(), 1);
            assert_eq!(instance.get("items"), Some(&json!([{"label": "x"}])));
            assert_eq!(instance.render(), rendered);
        }

        #[test]
        fn should_let_callers_continue_after_an_ignored_assignment() {
            fn update(instance: &mut Instance) -> shadow_view::Result<()> {
                instance.set("items", json!("oops"))?;
                instance.set("title", json!("after"))?;
                Ok(())
            }

            let mut instance = instantiate(LIST, None);
            update(&mut instance).unwrap();
            assert_eq!(instance.render(), "<div><h2>after</h2><ul></ul></div>");
        }

        #[test]
        fn should_skip_non_sequences_during_configure() {
            let mut instance = instantiate(LIST, None);
            instance.configure(&json!({"title": "T", "items": "nope"}));
            assert_eq!(instance.render(), "<div><h2>T</h2><ul></ul></div>");
            assert_eq!(instance.get("items"), None);
        }

        #[test]
        fn should_keep_previous_children_when_a_child_cannot_be_built() {
            // Region views are built as the generic class, which this
            // registry does not provide.
            let mut registry = ComponentRegistry::empty();
            registry.register("Root", || Box::new(GenericComponent::default()) as Box<dyn Component>);
            let template = Template::new(LIST).with_registry(Arc::new(registry));
            let mut instance = template.compile_view(Some("Root"), None).unwrap();
            let nodes = instance.dom().borrow().len();

            let err = instance.set("items", json!([{"label": "x"}])).unwrap_err();
            assert!(matches!(err, Error::UnknownComponentClass(_)));
            assert!(instance.children("items").is_empty());
            assert_eq!(instance.dom().borrow().len(), nodes);
        }
    }

    mod nesting {
        use super::*;

        const TABLE: &str =
            r#"<table><tr data-repeat="rows"><td data-repeat="cells">${@}</td></tr></table>"#;

        #[test]
        fn should_instantiate_nested_regions() {
            let mut instance = instantiate(
                TABLE,
                Some(json!({"rows": [{"cells": [1, 2]}, {"cells": [3]}]})),
            );
            assert_eq!(
                instance.render(),
                "<table><tr><td>1</td><td>2</td></tr><tr><td>3</td></tr></table>"
            );
            assert_eq!(instance.children("rows")[0].children("cells").len(), 2);

            instance.set("rows", json!([])).unwrap();
            assert_eq!(instance.render(), "<table></table>");
        }

        #[test]
        fn should_keep_siblings_independent() {
            let mut instance = instantiate(LIST, Some(json!({"items": [{"label": "x"}, {"label": "y"}]})));

            instance.children_mut("items")[0].set("label", json!("changed")).unwrap();

            let children = instance.children("items");
            assert_eq!(children[0].text_content(), "changed");
            assert_eq!(children[1].text_content(), "y");
            assert_eq!(children[1].get("label"), Some(&json!("y")));
            assert_eq!(
                instance.render(),
                r#"<div><h2></h2><ul><li class="">changed</li><li class="">y</li></ul></div>"#
            );
        }
    }
}
