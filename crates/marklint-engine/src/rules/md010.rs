use crate::plugins::{Plugin, PluginHooks, PluginMetadata, ScanContext};

/// Hard tab characters anywhere on a line.
pub struct NoHardTabs;

impl Plugin for NoHardTabs {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            id: "md010",
            aliases: &["no-hard-tabs"],
            description: "Hard tabs",
        }
    }

    fn hooks(&self) -> PluginHooks {
        PluginHooks {
            next_line: true,
            next_token: false,
        }
    }

    fn next_line(
        &mut self,
        context: &mut ScanContext<'_>,
        line_number: usize,
        line: &str,
    ) -> anyhow::Result<()> {
        if let Some(index) = line.chars().position(|c| c == '\t') {
            context.report(line_number, index + 1, None);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{positions, violations};
    use rstest::rstest;

    #[rstest]
    #[case("no tabs here", vec![])]
    #[case("\tindented", vec![(1, 1)])]
    #[case("a\tb\tc", vec![(1, 2)])]
    #[case("one\n\ttwo\nthree\t", vec![(2, 1), (3, 6)])]
    #[case("é\tx", vec![(1, 2)])]
    fn reports_first_tab_per_line(#[case] input: &str, #[case] expected: Vec<(usize, usize)>) {
        assert_eq!(positions(Box::new(NoHardTabs), input), expected);
    }

    #[test]
    fn violation_carries_rule_identity() {
        let found = violations(Box::new(NoHardTabs), "\tx");
        assert_eq!(found[0].rule_id, "MD010");
        assert_eq!(found[0].rule_name, "no-hard-tabs");
        assert_eq!(found[0].to_string(), "1:1: MD010: Hard tabs (no-hard-tabs)");
    }
}
