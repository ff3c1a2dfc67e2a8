// acquisition:sentinelsat - Sentinel 2 product search and download

use crate::domain::{
    CommandArg, CommandSpec, Format, InputField, InvocationContext, OutputField,
    ProcessDescriptor, Request, Response, Uom,
};
use crate::error::Result;
use crate::port::{FieldBindings, PathTranslator, ProcessDefinition, Workspace};
use crate::processes::{sample_metadata, SentinelCredentials};
use tracing::debug;

pub const IDENTIFIER: &str = "acquisition:sentinelsat";

const SEARCH_POLYGON: &str = "search_polygon";
const CLOUD_PERCENTAGE: &str = "cloud_percentage";
const START_DATE: &str = "start_date";
const END_DATE: &str = "end_date";
const OUTPUT_DIR: &str = "output_dir";

/// Subdirectory of the invocation output dir receiving the products
const PRODUCTS_SUBDIR: &str = "sen2";
const SENTINEL_GENERATION: &str = "2";

/// Downloads Sentinel 2 products matching a region, cloud ceiling and date window
///
/// Outputs the workflow-volume path of the download directory rather than the
/// products themselves.
pub struct SentinelDownload {
    descriptor: ProcessDescriptor,
    credentials: SentinelCredentials,
}

impl SentinelDownload {
    pub fn new(credentials: SentinelCredentials) -> Self {
        let inputs = vec![
            InputField::document(SEARCH_POLYGON, "GeoJSON region", vec![Format::geojson()])
                .with_abstract("GeoJson of region to search"),
            InputField::integer(CLOUD_PERCENTAGE, "Max cloud Percentage")
                .with_abstract("Maximum cloud cover in percentage (e.g. 30)")
                .with_range(0, 100),
            InputField::integer(START_DATE, "Start date")
                .with_abstract("Datestamp in format YYYYMMDD"),
            InputField::integer(END_DATE, "End date").with_abstract("Datestamp in format YYYYMMDD"),
        ];
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
                title: "Sentinel 2 Data acquisition".to_string(),
                abstract_text: "Use sentinelsat python module to download sentinel data"
                    .to_string(),
                version: "0.1".to_string(),
                metadata: sample_metadata(&["Sample", "Test"]),
                profile: String::new(),
                inputs,
                outputs,
            },
            credentials,
        }
    }
}

impl ProcessDefinition for SentinelDownload {
    fn describe(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    fn bindings(&self) -> FieldBindings {
        FieldBindings {
            inputs: &[CLOUD_PERCENTAGE, START_DATE, END_DATE, SEARCH_POLYGON],
            outputs: &[OUTPUT_DIR],
        }
    }

    fn synthesize(
        &self,
        request: &Request,
        ctx: &mut InvocationContext,
        workspace: &dyn Workspace,
    ) -> Result<CommandSpec> {
        let products_dir = ctx.output_dir.join(PRODUCTS_SUBDIR);
        workspace.ensure_dir(&products_dir)?;

        let polygon = request.document(SEARCH_POLYGON)?;
        let args = vec![
            CommandArg::from("search"),
            CommandArg::from("--sentinel"),
            CommandArg::from(SENTINEL_GENERATION),
            CommandArg::from("-d"),
            CommandArg::from("--cloud"),
            CommandArg::from(request.literal(CLOUD_PERCENTAGE)?),
            CommandArg::from("-s"),
            CommandArg::from(request.literal(START_DATE)?),
            CommandArg::from("-e"),
            CommandArg::from(request.literal(END_DATE)?),
            CommandArg::from("-p"),
            CommandArg::from(products_dir.to_string_lossy().into_owned()),
            CommandArg::Secret(self.credentials.user.clone()),
            CommandArg::Secret(self.credentials.password.clone()),
            CommandArg::from(polygon.to_string_lossy().into_owned()),
        ];

        debug!(products_dir = %products_dir.display(), "Prepared sentinel download directory");
        ctx.set_result_dir(products_dir);

        Ok(CommandSpec::argv("sentinel", args))
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
    use crate::port::path_translator::{MockPathTranslator, PathError};
    use crate::port::workspace::mocks::RecordingWorkspace;
    use std::path::{Path, PathBuf};

    fn process() -> SentinelDownload {
        SentinelDownload::new(SentinelCredentials::new("scihub-user", "scihub-pass"))
    }

    fn request() -> Request {
        Request::new()
            .with(
                SEARCH_POLYGON,
                InputValue::document("/tmp/uploads/region.geojson", Format::GEOJSON),
            )
            .with(CLOUD_PERCENTAGE, InputValue::integer(30))
            .with(START_DATE, InputValue::integer(20200101))
            .with(END_DATE, InputValue::integer(20200201))
    }

    #[test]
    fn test_command_flags_in_order() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");

        let cmd = process()
            .synthesize(&request(), &mut ctx, &workspace)
            .unwrap();

        assert_eq!(
            cmd.plain_args(),
            vec![
                "search",
                "--sentinel",
                "2",
                "-d",
                "--cloud",
                "30",
                "-s",
                "20200101",
                "-e",
                "20200201",
                "-p",
                "/data_service/inv-1/sen2",
                "/tmp/uploads/region.geojson",
            ]
        );

        let (program, argv) = cmd.to_argv();
        assert_eq!(program, "sentinel");
        assert_eq!(argv[12], "scihub-user");
        assert_eq!(argv[13], "scihub-pass");
    }

    #[test]
    fn test_credentials_never_displayed() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");

        let cmd = process()
            .synthesize(&request(), &mut ctx, &workspace)
            .unwrap();

        let shown = cmd.to_string();
        assert!(!shown.contains("scihub-pass"));
        assert!(!shown.contains("scihub-user"));
    }

    #[test]
    fn test_products_dir_provisioned_and_recorded() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");

        process()
            .synthesize(&request(), &mut ctx, &workspace)
            .unwrap();

        let expected = PathBuf::from("/data_service/inv-1/sen2");
        assert_eq!(workspace.created(), vec![expected.clone()]);
        assert_eq!(ctx.result_dir().unwrap(), expected.as_path());
    }

    #[test]
    fn test_missing_polygon_is_reported() {
        let workspace = RecordingWorkspace::new();
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");
        let req = Request::new()
            .with(CLOUD_PERCENTAGE, InputValue::integer(30))
            .with(START_DATE, InputValue::integer(20200101))
            .with(END_DATE, InputValue::integer(20200201));

        let result = process().synthesize(&req, &mut ctx, &workspace);
        assert!(result.unwrap_err().to_string().contains(SEARCH_POLYGON));
    }

    #[test]
    fn test_output_dir_mapped_with_unity() {
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");
        ctx.set_result_dir(PathBuf::from("/data_service/inv-1/sen2"));

        let mut volume = MockPathTranslator::new();
        volume
            .expect_workflow_path()
            .withf(|p: &Path| p == Path::new("/data_service/inv-1/sen2"))
            .times(1)
            .returning(|_| Ok("/workflow_data/inv-1/sen2".to_string()));

        let p = process();
        let mut response = Response::for_descriptor(p.describe());
        p.map_output(&request(), &ctx, &mut response, &volume)
            .unwrap();

        let value = response.get(OUTPUT_DIR).unwrap();
        assert_eq!(value.data, "/workflow_data/inv-1/sen2");
        assert_eq!(value.uom, Some(Uom::unity()));
    }

    #[test]
    fn test_translation_failure_leaves_response_unset() {
        let mut ctx = InvocationContext::new("inv-1", "/data_service/inv-1");
        ctx.set_result_dir(PathBuf::from("/data_service/inv-1/sen2"));

        let mut volume = MockPathTranslator::new();
        volume
            .expect_workflow_path()
            .returning(|p| Err(PathError::Missing(p.to_path_buf())));

        let p = process();
        let mut response = Response::for_descriptor(p.describe());
        let result = p.map_output(&request(), &ctx, &mut response, &volume);

        assert!(result.is_err());
        assert!(response.get(OUTPUT_DIR).is_none());
    }
}
