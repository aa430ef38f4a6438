use indexmap::IndexMap;

/// Shared stylesheet rules, keyed by selector then property.
///
/// Mutating a rule affects every element the selector matches, which is how
/// widgets flip visibility for whole groups of elements at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSheet {
    rules: IndexMap<String, IndexMap<String, String>>,
}

impl RuleSheet {
    pub fn set_rule(&mut self, selector: &str, property: &str, value: &str) {
        self.rules
            .entry(selector.to_string())
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    pub fn rule(&self, selector: &str, property: &str) -> Option<&str> {
        self.rules
            .get(selector)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    pub fn render_css(&self) -> String {
        let mut out = String::new();
        for (selector, props) in &self.rules {
            out.push_str(selector);
            out.push_str(" {");
            for (property, value) in props {
                out.push_str(&format!(" {property}: {value};"));
            }
            out.push_str(" }\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::RuleSheet;

    #[test]
    fn later_writes_replace_a_property_in_place() {
        let mut sheet = RuleSheet::default();
        sheet.set_rule(".io-file .remote", "display", "none");
        sheet.set_rule(".io-file .local", "display", "inline");
        sheet.set_rule(".io-file .remote", "display", "inline");

        assert_eq!(sheet.rule(".io-file .remote", "display"), Some("inline"));
        assert_eq!(
            sheet.render_css(),
            ".io-file .remote { display: inline; }\n.io-file .local { display: inline; }\n"
        );
    }
}
