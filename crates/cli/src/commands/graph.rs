//! Graph command: dump the project call graph

use anyhow::Result;
use ripple_core::ImpactService;
use std::path::Path;

use crate::output;
use crate::progress::Step;
use crate::OutputFormat;

pub fn run(path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    let service = ImpactService::from_root(root)?;

    let step = Step::maybe("Building call graph", format == OutputFormat::Terminal);
    let run = service.build_graph()?;
    step.finish(&format!("{} files", run.files.len()));

    match format {
        OutputFormat::Terminal => {
            println!();
            for line in output::terminal::format_graph(&run) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let out = output::json::build_graph_output(&run);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
