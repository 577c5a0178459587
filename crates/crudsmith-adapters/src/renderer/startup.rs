//! Startup script: install dependencies, then run the dev server.

use crudsmith_core::domain::StartupScriptFlavor;

/// Render the startup script for `flavor`.
///
/// `setup` runs once between install and start, and is skipped when a
/// `tsconfig.json` already exists.
pub fn startup_script(project_name: &str, flavor: StartupScriptFlavor, setup: Option<&str>) -> String {
    match flavor {
        StartupScriptFlavor::Batch => {
            let mut lines = vec![
                "@echo off".to_string(),
                format!("echo Installing dependencies for {project_name}..."),
                "call npm install".to_string(),
            ];
            if let Some(setup) = setup {
                lines.push(format!("if not exist tsconfig.json call {setup}"));
            }
            lines.push("call npm run dev".to_string());
            // cmd.exe expects CRLF
            lines.iter().map(|l| format!("{l}\r\n")).collect()
        }
        StartupScriptFlavor::Shell => {
            let mut lines = vec![
                "#!/bin/sh".to_string(),
                "set -e".to_string(),
                String::new(),
                format!("echo \"Installing dependencies for {project_name}...\""),
                "npm install".to_string(),
            ];
            if let Some(setup) = setup {
                lines.push(format!("[ -f tsconfig.json ] || {setup}"));
            }
            lines.push("npm run dev".to_string());
            lines.iter().map(|l| format!("{l}\n")).collect()
        }
    }
}
