// sleep - Sleeps for a number of seconds; used to chain processes

use crate::domain::{
    CommandSpec, InputField, InvocationContext, OutputField, ProcessDescriptor, Request, Response,
};
use crate::error::Result;
use crate::port::{FieldBindings, PathTranslator, ProcessDefinition, Workspace};
use crate::processes::sample_metadata;

pub const IDENTIFIER: &str = "sleep";

const SLEEP_SEC: &str = "sleep_sec";
const CHAIN_NODE: &str = "chain_node";
const CHAIN: &str = "chain";

const SCRIPT: &str = "sleep_script.sh";
const CHAIN_VALUE: &str = "okay";

pub struct Sleep {
    descriptor: ProcessDescriptor,
}

impl Sleep {
    pub fn new() -> Self {
        let inputs = vec![
            InputField::integer(SLEEP_SEC, "Seconds to sleep for")
                .with_abstract("Seconds to sleep for."),
            // Lets a workflow order this process after another without a data dependency
            InputField::string(CHAIN_NODE, "Allow chaining.")
                .with_abstract("Allows chaining without an actual dependency.")
                .with_occurs(0, 1),
        ];
        let outputs = vec![OutputField::string(CHAIN, "Nothing")
            .with_abstract("Empty ouput that can help chain processes.")];

        Self {
            descriptor: ProcessDescriptor {
                identifier: IDENTIFIER.to_string(),
                title: "Sleeper".to_string(),
                abstract_text: "Sleeps for a few seconds".to_string(),
                version: "0.1".to_string(),
                metadata: sample_metadata(&["Sample", "Test"]),
                profile: String::new(),
                inputs,
                outputs,
            },
        }
    }
}

impl Default for Sleep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessDefinition for Sleep {
    fn describe(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    fn bindings(&self) -> FieldBindings {
        FieldBindings {
            inputs: &[SLEEP_SEC],
            outputs: &[CHAIN],
        }
    }

    fn synthesize(
        &self,
        request: &Request,
        _ctx: &mut InvocationContext,
        _workspace: &dyn Workspace,
    ) -> Result<CommandSpec> {
        let seconds = request.literal(SLEEP_SEC)?;
        Ok(CommandSpec::argv("bash", [SCRIPT.to_string(), seconds]))
    }

    fn map_output(
        &self,
        _request: &Request,
        _ctx: &InvocationContext,
        response: &mut Response,
        _volume: &dyn PathTranslator,
    ) -> Result<()> {
        response.set(CHAIN, CHAIN_VALUE, None)?;
        Ok(())
    }
}
