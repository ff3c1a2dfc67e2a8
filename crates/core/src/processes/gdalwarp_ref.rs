// gdalwarp_ref - Raster warping over a workflow volume directory

use crate::domain::{
    CommandSpec, InputField, InvocationContext, OutputField, ProcessDescriptor, Request, Response,
    Uom,
};
use crate::error::Result;
use crate::port::{FieldBindings, PathTranslator, ProcessDefinition, Workspace};
use crate::processes::sample_metadata;

pub const IDENTIFIER: &str = "gdalwarp_ref";

const INPUT_DIR: &str = "input_dir";
const OUTPUT_DIR: &str = "output_dir";

const SCRIPT: &str = "gdalwarp_script.sh";
const RESIZED_SUBDIR: &str = "resized";

/// Warps every raster found in a workflow directory into `<output_dir>/resized`
///
/// The script creates the output directory itself.
pub struct GdalWarpRef {
    descriptor: ProcessDescriptor,
}

impl GdalWarpRef {
    pub fn new() -> Self {
        let inputs = vec![InputField::string(INPUT_DIR, "Workflow data volume path")
            .with_abstract(
                "Path to a directory within the Workflow Data volume. The service will \
                 locate all files within this directory and warp them.",
            )
            .with_occurs(1, 2)];
        let outputs = vec![OutputField::string(OUTPUT_DIR, "Workflow data volume path")
            .with_abstract(
                "Path to a directory within the Workflow Data volume. The service will \
                 store all outputs in this dir, then provide a reference to the directory \
                 which other services can use.",
            )
            .with_uom(Uom::unity())];

        Self {
            descriptor: ProcessDescriptor {
                identifier: IDENTIFIER.to_string(),
                title: "GDAL Sample Process".to_string(),
                abstract_text: "The process warps an input raster. Locates all tiff files \
                                within the input_dir and creates a warped version in the \
                                output_dir location."
                    .to_string(),
                version: "0.1".to_string(),
                metadata: sample_metadata(&["Sample", "Test"]),
                profile: String::new(),
                inputs,
                outputs,
            },
        }
    }
}

impl Default for GdalWarpRef {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessDefinition for GdalWarpRef {
    fn describe(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    fn bindings(&self) -> FieldBindings {
        FieldBindings {
            inputs: &[INPUT_DIR],
            outputs: &[OUTPUT_DIR],
        }
    }

    fn synthesize(
        &self,
        request: &Request,
        ctx: &mut InvocationContext,
        _workspace: &dyn Workspace,
    ) -> Result<CommandSpec> {
        // Only the first occurrence is warped
        let input_dir = request.literal(INPUT_DIR)?;
        let resized_dir = ctx.output_dir.join(RESIZED_SUBDIR);

        let cmd = CommandSpec::argv(
            "bash",
            [
                SCRIPT.to_string(),
                input_dir,
                resized_dir.to_string_lossy().into_owned(),
            ],
        );
        ctx.set_result_dir(resized_dir);
        Ok(cmd)
    }

    fn map_output(
        &self,
        _request: &Request,
        ctx: &InvocationContext,
        response: &mut Response,
        volume: &dyn PathTranslator,
    ) -> Result<()> {
        let shared = volume.workflow_path(ctx.result_dir()?)?;
        response.set(OUTPUT_DIR, shared, Some(Uom::unity()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputValue;
    use crate::port::path_translator::MockPathTranslator;
    use crate::port::workspace::mocks::RecordingWorkspace;
    use std::path::Path;

    #[test]
    fn test_paths_are_positional() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-7", "/vol/out");
        let req = Request::new().with(INPUT_DIR, InputValue::string("/vol/in"));

        let cmd = GdalWarpRef::new()
            .synthesize(&req, &mut ctx, &workspace)
            .unwrap();

        assert_eq!(
            cmd,
            CommandSpec::argv("bash", ["gdalwarp_script.sh", "/vol/in", "/vol/out/resized"])
        );
        assert_eq!(ctx.result_dir().unwrap(), Path::new("/vol/out/resized"));
        assert!(workspace.created().is_empty());
    }

    #[test]
    fn test_second_input_dir_ignored() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-8", "/vol/out");
        let req = Request::new()
            .with(INPUT_DIR, InputValue::string("/vol/a"))
            .with(INPUT_DIR, InputValue::string("/vol/b"));

        let cmd = GdalWarpRef::new()
            .synthesize(&req, &mut ctx, &workspace)
            .unwrap();

        assert_eq!(cmd.plain_args(), vec!["gdalwarp_script.sh", "/vol/a", "/vol/out/resized"]);
    }

    #[test]
    fn test_mapping_before_synthesis_fails() {
        let ctx = InvocationContext::new("inv-9", "/vol/out");
        let mut volume = MockPathTranslator::new();
        volume.expect_workflow_path().never();

        let process = GdalWarpRef::new();
        let mut response = Response::for_descriptor(process.describe());
        let result = process.map_output(&Request::new(), &ctx, &mut response, &volume);

        assert!(result.is_err());
        assert!(response.is_empty());
    }
}
