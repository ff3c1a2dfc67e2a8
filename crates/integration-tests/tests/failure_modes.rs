//! Failure propagation: every failure is fatal for its request, with no
//! partially populated response.

mod common;

use common::Harness;
use eo4a_core::domain::{InputValue, Request};
use eo4a_core::port::path_translator::PathError;
use eo4a_core::port::ExecutionError;
use eo4a_core::AppError;

#[tokio::test]
async fn test_script_failure_is_fatal() {
    let h = Harness::new();
    h.script(
        "gdalwarp_script.sh",
        "#!/bin/bash\necho 'no rasters found' >&2\nexit 4\n",
    );
    let request = Request::new().with("input_dir", InputValue::string("/vol/empty"));

    let err = h.runner.run("gdalwarp_ref", &request).await.unwrap_err();

    match err {
        AppError::Execution(ExecutionError::NonZeroExit { code, stderr, .. }) => {
            assert_eq!(code, Some(4));
            assert_eq!(stderr, "no rasters found");
        }
        other => panic!("expected non-zero exit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_result_dir_is_fatal() {
    let h = Harness::new();
    // Exits cleanly without creating the output directory
    h.script("gdalwarp_script.sh", "#!/bin/bash\nexit 0\n");
    let request = Request::new().with("input_dir", InputValue::string("/vol/in"));

    let err = h.runner.run("gdalwarp_ref", &request).await.unwrap_err();

    assert!(matches!(err, AppError::Path(PathError::Missing(_))));
}

#[tokio::test]
async fn test_missing_script_is_fatal() {
    let h = Harness::new();
    std::fs::remove_file(h.scripts_dir.join("sleep_script.sh")).unwrap();
    let request = Request::new().with("sleep_sec", InputValue::integer(1));

    // bash itself starts, then fails to open the script
    let err = h.runner.run("sleep", &request).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Execution(ExecutionError::NonZeroExit { .. })
    ));
}

#[tokio::test]
async fn test_unknown_process_is_not_found() {
    let h = Harness::new();

    let err = h.runner.run("acquisition:landsat", &Request::new()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_invocations_are_isolated() {
    let h = Harness::new();
    let a = Request::new().with("input_dir", InputValue::string("/vol/a"));
    let b = Request::new().with("input_dir", InputValue::string("/vol/b"));

    let (first, second) = tokio::join!(
        h.runner.run("gdalwarp_ref", &a),
        h.runner.run("gdalwarp_ref", &b)
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_ne!(first.invocation_id, second.invocation_id);
    assert_ne!(
        first.response.get("output_dir").unwrap().data,
        second.response.get("output_dir").unwrap().data
    );
    for (outcome, input) in [(&first, "/vol/a"), (&second, "/vol/b")] {
        let manifest = h
            .data_root
            .join(&outcome.invocation_id)
            .join("resized")
            .join("manifest.txt");
        assert_eq!(
            std::fs::read_to_string(manifest).unwrap(),
            format!("warped {}\n", input)
        );
    }
}
