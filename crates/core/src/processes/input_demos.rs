// input_demos - Showcases the supported input kinds; the command is a stub

use crate::domain::{
    CommandSpec, Format, InputField, InvocationContext, OutputField, ProcessDescriptor, Request,
    Response,
};
use crate::error::Result;
use crate::port::{FieldBindings, PathTranslator, ProcessDefinition, Workspace};
use crate::processes::sample_metadata;

pub const IDENTIFIER: &str = "input_demos";

const SENTINEL_PRODUCTS: &str = "sentinel_products";
const GEOJSON: &str = "geojson";
const RANGED: &str = "ranged";
const NONE: &str = "none";

const DONE_VALUE: &str = "done";

pub struct InputDemos {
    descriptor: ProcessDescriptor,
}

impl InputDemos {
    pub fn new() -> Self {
        let inputs = vec![
            // Abstract is read by clients as a UI helper hint
            InputField::string(SENTINEL_PRODUCTS, "Sentine Product IDs")
                .with_abstract("helper:sentinel_product_select"),
            InputField::document(GEOJSON, "GeoJSON region", vec![Format::geojson()])
                .with_abstract("GeoJson"),
            InputField::integer(RANGED, "Ranged Value")
                .with_abstract("Sample of allowed_value usage")
                .with_range(0, 100),
        ];
        let outputs = vec![OutputField::string(NONE, "Nothing").with_abstract("Empty ouput.")];

        Self {
            descriptor: ProcessDescriptor {
                identifier: IDENTIFIER.to_string(),
                title: "Input Demos".to_string(),
                abstract_text: "Input demonstrators.".to_string(),
                version: "0.1".to_string(),
                metadata: sample_metadata(&["Sample", "Input"]),
                profile: String::new(),
                inputs,
                outputs,
            },
        }
    }
}

impl Default for InputDemos {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessDefinition for InputDemos {
    fn describe(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    fn bindings(&self) -> FieldBindings {
        FieldBindings {
            inputs: &[],
            outputs: &[NONE],
        }
    }

    fn synthesize(
        &self,
        _request: &Request,
        _ctx: &mut InvocationContext,
        _workspace: &dyn Workspace,
    ) -> Result<CommandSpec> {
        Ok(CommandSpec::argv("echo", ["sample"]))
    }

    /// Writes to the declared `none` output; there is no `chain` output here.
    fn map_output(
        &self,
        _request: &Request,
        _ctx: &InvocationContext,
        response: &mut Response,
        _volume: &dyn PathTranslator,
    ) -> Result<()> {
        response.set(NONE, DONE_VALUE, None)?;
        Ok(())
    }
}
