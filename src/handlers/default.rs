//! Default handler: runs one code unit and prints what came back.

use anyhow::Result;
use pyrepl::PythonRepl;

use super::Fencing;
use crate::printer::print_output;

pub struct DefaultHandler;

impl DefaultHandler {
    pub fn run(repl: &mut PythonRepl, code: &str, fencing: &Fencing) -> Result<()> {
        let output = repl.run(fencing.apply(code));
        print_output(&output)?;
        Ok(())
    }

    /// Print the local namespace as a JSON object.
    pub fn show_locals(repl: &mut PythonRepl) -> Result<()> {
        let locals: serde_json::Map<String, serde_json::Value> = repl
            .locals()?
            .into_iter()
            .map(|(name, binding)| (name, binding.to_json()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&locals)?);
        Ok(())
    }
}
