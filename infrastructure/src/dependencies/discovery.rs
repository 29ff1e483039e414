use serde::Serialize;
use std::path::PathBuf;

/// One program and where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredTool {
    pub program: String,
    /// Resolved executable, `None` when not on `PATH`
    pub path: Option<PathBuf>,
}

impl DiscoveredTool {
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Result of tool discovery, in the order programs were requested
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryResult {
    pub tools: Vec<DiscoveredTool>,
}

impl DiscoveryResult {
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.tools
            .iter()
            .filter(|t| !t.is_found())
            .map(|t| t.program.as_str())
    }

    pub fn all_found(&self) -> bool {
        self.tools.iter().all(DiscoveredTool::is_found)
    }
}

/// Resolve each program on `PATH`
pub fn discover_tools<'a>(programs: impl IntoIterator<Item = &'a str>) -> DiscoveryResult {
    let tools = programs
        .into_iter()
        .map(|program| DiscoveredTool {
            program: program.to_string(),
            path: which::which(program).ok(),
        })
        .collect();
    DiscoveryResult { tools }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_result_default() {
        let result = DiscoveryResult::default();
        assert!(result.all_found());
        assert_eq!(result.missing().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_tools_preserves_order() {
        let result = discover_tools(["biorun-no-such-program-xyz", "sh"]);

        assert_eq!(result.tools[0].program, "biorun-no-such-program-xyz");
        assert!(!result.tools[0].is_found());
        assert!(result.tools[1].is_found());
        assert_eq!(
            result.missing().collect::<Vec<_>>(),
            vec!["biorun-no-such-program-xyz"]
        );
        assert!(!result.all_found());
    }
}
