use std::path::{Path, PathBuf};
use std::time::Instant;

use super::*;
use crate::export::ExportProject;
use crate::foundation::core::FrameIndex;
use crate::gateway::ScriptedGenerator;

const RESPONSE: &str = "Here is your video:\n\n```tsx\nconst HelloVideo: React.FC = () => {\n  const frame = useCurrentFrame();\n  return <AbsoluteFill><h1>Hello {frame}</h1></AbsoluteFill>;\n};\n\nexport default HelloVideo;\n```\n\nThis component fades in a greeting.";

struct FakeBackend;

impl RenderBackend for FakeBackend {
    fn bundle(&self, project: &ExportProject, _deadline: Instant) -> ReelResult<PathBuf> {
        Ok(project.bundle_dir())
    }

    fn render(&self, _: &ExportProject, _: &Path, output: &Path, _: Instant) -> ReelResult<()> {
        std::fs::write(output, b"mp4").map_err(anyhow::Error::from)?;
        Ok(())
    }
}

fn studio(generator: ScriptedGenerator) -> Studio {
    Studio::new(Settings::default(), Box::new(generator), Box::new(FakeBackend)).unwrap()
}

#[test]
fn generate_response_wire_shapes() {
    let ok = serde_json::to_string(&GenerateResponse::Ok { code: "x".into() }).unwrap();
    assert_eq!(ok, r#"{"code":"x"}"#);
    let err: GenerateResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
    assert_eq!(err, GenerateResponse::Err { error: "boom".into() });
}

#[test]
fn handle_generate_returns_normalized_code() {
    let s = studio(ScriptedGenerator::ok(RESPONSE));
    let resp = s.handle_generate(&GenerateRequest {
        description: "Say hello".into(),
    });
    let GenerateResponse::Ok { code } = resp else {
        panic!("expected code, got {resp:?}");
    };
    assert!(code.starts_with("const HelloVideo"));
    assert!(code.ends_with("export default HelloVideo;"));
    assert!(s.code().is_none());
}

#[test]
fn generation_failure_keeps_previous_session() {
    let mut s = studio(ScriptedGenerator::ok(RESPONSE));
    s.generate("Say hello").unwrap();
    s.generator = Box::new(ScriptedGenerator::failing("claude: command not found"));
    let err = s.generate("Say hello again").unwrap_err();
    assert!(matches!(err, ReelError::Generation(_)));
    assert!(s.code().is_some());
    assert!(s.preview().is_some());
}

#[test]
fn generate_loads_the_preview() {
    let mut s = studio(ScriptedGenerator::ok(RESPONSE));
    let host = s.generate("Say hello").unwrap();
    assert_eq!(host.unit().component_name(), Some("HelloVideo"));
    let host = s.preview_mut().unwrap();
    let frame = host.render_frame(FrameIndex(42)).unwrap();
    assert_eq!(frame.text_content(), "Hello 42");
}

#[test]
fn uncompilable_code_is_still_exportable() {
    let mut s = studio(ScriptedGenerator::ok("class Broken {}\nexport default Broken;"));
    let err = s.generate("anything").unwrap_err();
    assert!(err.to_string().contains(COMPILE_FAILED));
    assert!(s.preview().is_none());
    assert!(s.code().is_some());
    assert_eq!(s.export().unwrap().bytes, b"mp4");
}

#[test]
fn export_requires_a_generation() {
    let s = studio(ScriptedGenerator::ok(RESPONSE));
    assert!(matches!(s.export(), Err(ReelError::Validation(_))));
}

#[test]
fn empty_description_is_rejected() {
    let s = studio(ScriptedGenerator::ok(RESPONSE));
    let resp = s.handle_generate(&GenerateRequest {
        description: "   ".into(),
    });
    assert!(matches!(resp, GenerateResponse::Err { .. }));
}

#[test]
fn handle_export_reports_errors_as_payloads() {
    let s = studio(ScriptedGenerator::ok(RESPONSE));
    let artifact = s
        .handle_export(&ExportRequest {
            code: "export default () => null;".into(),
        })
        .unwrap();
    assert_eq!(artifact.content_type, "video/mp4");
    assert_eq!(
        artifact.content_disposition(),
        "attachment; filename=\"marketing-video.mp4\""
    );

    let err = s.handle_export(&ExportRequest { code: String::new() }).unwrap_err();
    assert!(!err.error.is_empty());
}
