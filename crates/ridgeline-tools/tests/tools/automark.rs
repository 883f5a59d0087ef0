use async_trait::async_trait;
use ridgeline_annotator::minutiae::RIDGE_ENDING_TYPE_ID;
use ridgeline_annotator::{default_fingerprint_types, CanvasRegistry};
use ridgeline_core::{CanvasId, WorkingMode};
use ridgeline_tools::{
    auto_mark, AutoMarkReport, ExecutionPlan, ProcessAdapter, ProcessOutput, SourceAfisStrategy,
    SourceAfisTool, ToolError, UnconfiguredStrategy,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Stands in for the detector: writes the requested outputs and exits
/// with a fixed code.
struct FakeDetector {
    code: i32,
    template: bool,
    json: Option<&'static str>,
    calls: AtomicUsize,
}

impl FakeDetector {
    fn new(json: Option<&'static str>) -> Self {
        Self {
            code: 0,
            template: true,
            json,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProcessAdapter for FakeDetector {
    async fn execute(
        &self,
        plan: &ExecutionPlan,
        _timeout: Duration,
    ) -> Result<ProcessOutput, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(plan.arg_value("--image").is_some());
        if self.template {
            let path = plan.arg_value("--out-template").unwrap();
            tokio::fs::write(path, b"template").await?;
        }
        if let Some(json) = self.json {
            let path = plan.arg_value("--out-json").unwrap();
            tokio::fs::write(path, json).await?;
        }
        Ok(ProcessOutput {
            code: Some(self.code),
            stdout: String::new(),
            stderr: if self.code == 0 { String::new() } else { "boom".into() },
            duration: Duration::from_millis(5),
        })
    }
}

const TWO_MINUTIAE: &str = r#"{
    "minutiae": [
        { "x": 10, "y": 20, "direction": 0, "type": "ending" },
        { "x": 30, "y": 40, "direction": 1.5707963267948966, "type": "bifurcation" }
    ],
    "width": 100,
    "height": 100
}"#;

fn tool(detector: FakeDetector) -> SourceAfisTool<FakeDetector> {
    SourceAfisTool::new(
        Box::new(SourceAfisStrategy::new("sourceafis_cli")),
        detector,
        Duration::from_secs(1),
    )
}

fn registry() -> CanvasRegistry {
    CanvasRegistry::new(WorkingMode::Fingerprint).with_types(default_fingerprint_types())
}

type RunResult = (Result<AutoMarkReport, ToolError>, CanvasRegistry, tempfile::TempDir);

async fn run(detector: FakeDetector) -> RunResult {
    let dir = tempfile::tempdir().unwrap();
    let tool = tool(detector);
    let mut registry = registry();
    let result = auto_mark(
        &tool,
        &mut registry,
        CanvasId::Left,
        Path::new("print.png"),
        Some((100.0, 100.0)),
        dir.path(),
    )
    .await;
    (result, registry, dir)
}

fn assert_untouched(registry: &CanvasRegistry) {
    assert!(registry.store(CanvasId::Left).markings().is_empty());
    assert_eq!(registry.labels().peek(), 1);
}

#[tokio::test]
async fn test_auto_mark_adds_rays() {
    let (result, registry, dir) = run(FakeDetector::new(Some(TWO_MINUTIAE))).await;
    let report = result.unwrap();
    assert_eq!(report.labels, vec![1, 2]);
    assert_eq!(report.detected, 2);

    let markings = registry.store(CanvasId::Left).markings();
    assert_eq!(markings.len(), 2);
    assert_eq!(markings[0].type_id, RIDGE_ENDING_TYPE_ID);
    assert!(markings[1].angle_rad().unwrap().abs() < 1e-12);

    // Tool outputs are cleaned up.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_non_zero_exit() {
    let mut detector = FakeDetector::new(Some(TWO_MINUTIAE));
    detector.code = 2;
    let (result, registry, _dir) = run(detector).await;
    match result.unwrap_err() {
        ToolError::NonZeroExit { code, stderr, .. } => {
            assert_eq!(code, Some(2));
            assert_eq!(stderr, "boom");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_missing_template() {
    let mut detector = FakeDetector::new(Some(TWO_MINUTIAE));
    detector.template = false;
    let (result, registry, _dir) = run(detector).await;
    assert!(matches!(result, Err(ToolError::MissingTemplate { .. })));
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_missing_json() {
    let (result, registry, _dir) = run(FakeDetector::new(None)).await;
    assert!(matches!(result, Err(ToolError::MissingJson { .. })));
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_malformed_json() {
    let (result, registry, _dir) = run(FakeDetector::new(Some("{ minutiae: "))).await;
    assert!(matches!(result, Err(ToolError::MalformedJson { .. })));
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_wrong_json_shape() {
    let (result, registry, _dir) = run(FakeDetector::new(Some(r#"{"minutiae": {}}"#))).await;
    assert!(matches!(result, Err(ToolError::WrongJsonShape(_))));
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_empty_minutiae_adds_nothing() {
    let (result, registry, _dir) = run(FakeDetector::new(Some("{}"))).await;
    let report = result.unwrap();
    assert!(report.labels.is_empty());
    assert_untouched(&registry);
}

#[tokio::test]
async fn test_unconfigured_tool_never_runs() {
    let dir = tempfile::tempdir().unwrap();
    let detector = FakeDetector::new(Some(TWO_MINUTIAE));
    let tool = SourceAfisTool::new(Box::new(UnconfiguredStrategy), detector, Duration::from_secs(1));
    let mut registry = registry();
    let result = auto_mark(
        &tool,
        &mut registry,
        CanvasId::Right,
        Path::new("print.png"),
        None,
        dir.path(),
    )
    .await;
    assert!(matches!(result, Err(ToolError::NotConfigured(_))));
    assert!(registry.store(CanvasId::Right).markings().is_empty());
}
