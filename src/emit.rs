//! Fragment emission over the ordered command list.
//!
//! All fragments come from a single pass over the same list, so the name
//! table, the dispatch array, and the reset procedure always agree on
//! indices.

use crate::classify::{self, ErrorSignal};
use crate::config::Indent;
use crate::errors::{Error, Result};
use crate::registry::Command;

/// The command used to probe whether an OpenCL library is worth loading.
pub const PROBE_COMMAND: &str = "clCreateContext";

const MSG_PREFIX: &str = "[cl3w] OpenCL API";
const MSG_SUFFIX: &str = "is not loaded/supported";

pub struct Emitter<'a> {
    commands: &'a [Command],
    indent: Indent,
}

impl<'a> Emitter<'a> {
    pub fn new(commands: &'a [Command], indent: Indent) -> Self {
        Self { commands, indent }
    }

    fn ind(&self, level: usize) -> String {
        self.indent.unit().repeat(level)
    }

    /// One function-pointer typedef per command.
    pub fn pfn_typedefs(&self) -> String {
        let mut out = String::new();
        for command in self.commands {
            out.push_str(&format!(
                "typedef {} (CL_API_CALL CL_API_ENTRYP {})({});\n",
                command.return_type().text(),
                classify::pfn_typedef_name(command),
                format_params(command)
            ));
        }
        out
    }

    /// The flat dispatch array plus one named accessor per command. The
    /// name-to-index mapping is fixed at generation time.
    pub fn api_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("#define CL3W_API_COUNT {}\n\n", self.commands.len()));
        out.push_str("CL3W_API extern CL3WclAPI cl3w_api_ptrs[CL3W_API_COUNT];\n");
        for (index, command) in self.commands.iter().enumerate() {
            let pfn = classify::pfn_typedef_name(command);
            out.push('\n');
            out.push_str(&format!(
                "static inline {} cl3w_get_{}(void) {{\n",
                pfn,
                command.name()
            ));
            out.push_str(&format!(
                "{}return ({pfn})cl3w_api_ptrs[{index}];\n",
                self.ind(1)
            ));
            out.push_str("}\n");
        }
        out
    }

    /// `#define` aliases expanding bare command names to accessor calls.
    pub fn name_aliases(&self) -> String {
        let mut out = String::new();
        for command in self.commands {
            out.push_str(&format!(
                "#define {:<50} (cl3w_get_{}())\n",
                command.name(),
                command.name()
            ));
        }
        out
    }

    /// Real-name wrappers delegating through the dispatch array.
    pub fn forwarding_impls(&self) -> String {
        let mut out = String::new();
        for (index, command) in self.commands.iter().enumerate() {
            if index != 0 {
                out.push('\n');
            }
            out.push_str(&format!(
                "{} {}({}) {{\n",
                command.return_type().text(),
                command.name(),
                format_params(command)
            ));
            out.push_str(&format!(
                "{}return cl3w_get_{}()({});\n",
                self.ind(1),
                command.name(),
                format_args(command)
            ));
            out.push_str("}\n");
        }
        out
    }

    /// Diagnostic stubs installed before the real symbols resolve.
    pub fn fallback_stubs(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "static const char cl3w_msg_prefix[] = \"{MSG_PREFIX}\";\n"
        ));
        out.push_str(&format!(
            "static const char cl3w_msg_suffix[] = \"{MSG_SUFFIX}\";\n"
        ));
        for (index, command) in self.commands.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!(
                "{} {}({}) {{\n",
                command.return_type().text(),
                classify::fallback_name(command),
                format_params(command)
            ));
            out.push_str(&format!(
                "{}fprintf(stderr, \"%s %s %s\\n\", cl3w_msg_prefix, cl3w_api_names[{index}], cl3w_msg_suffix);\n",
                self.ind(1)
            ));
            out.push_str(&format!(
                "{}/* CL_INVALID_HOST_PTR doubles as the unloaded-function indicator. */\n",
                self.ind(1)
            ));
            match classify::error_signal(command) {
                ErrorSignal::ReturnsErrorCode => {
                    out.push_str(&format!("{}return CL_INVALID_HOST_PTR;\n", self.ind(1)));
                }
                ErrorSignal::LastParamErrorOut => {
                    // the classification guarantees a last parameter
                    if let Some(param) = command.params().last() {
                        out.push_str(&format!(
                            "{}*{} = CL_INVALID_HOST_PTR;\n",
                            self.ind(1),
                            param.name
                        ));
                    }
                    out.push_str(&format!("{}return NULL;\n", self.ind(1)));
                }
                ErrorSignal::None => {
                    out.push_str(&format!("{}return NULL;\n", self.ind(1)));
                }
            }
            out.push_str("}\n");
        }
        out
    }

    /// String literals index-aligned with the dispatch array.
    pub fn name_table(&self) -> String {
        let mut out = String::from("static const char* cl3w_api_names[] = {\n");
        for command in self.commands {
            out.push_str(&format!("{}\"{}\",\n", self.ind(1), command.name()));
        }
        out.push_str("};\n");
        out
    }

    /// Point every dispatch slot back at its fallback stub.
    pub fn reset_procedure(&self) -> String {
        let mut out = String::from("static void reset_apis(void) {\n");
        for (index, command) in self.commands.iter().enumerate() {
            out.push_str(&format!(
                "{}cl3w_api_ptrs[{index}] = (CL3WclAPI){};\n",
                self.ind(1),
                classify::fallback_name(command)
            ));
        }
        out.push_str("}\n");
        out
    }

    /// Accessor returning the name-table entry of the probe anchor.
    pub fn probe_accessor(&self) -> Result<String> {
        let index = self
            .commands
            .iter()
            .position(|c| c.name() == PROBE_COMMAND)
            .ok_or_else(|| Error::MissingProbe(PROBE_COMMAND.to_string()))?;
        let mut out = String::from("static const char* get_probe_api_name(void) {\n");
        out.push_str(&format!("{}/* {PROBE_COMMAND} */\n", self.ind(1)));
        out.push_str(&format!("{}return cl3w_api_names[{index}];\n", self.ind(1)));
        out.push_str("}\n");
        Ok(out)
    }
}

fn format_params(command: &Command) -> String {
    command
        .params()
        .iter()
        .map(|p| p.ty.with_name(&p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_args(command: &Command) -> String {
    command
        .params()
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
