use std::path::Path;

use jonark::pipelines::program::{ProgramError, ShaderStage, validate_wgsl};

const PROGRAMS: [&str; 8] = [
    "triangle",
    "square",
    "textures",
    "two_faces",
    "lighting",
    "lamp",
    "model",
    "text",
];

fn read(program: &str, file: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("shaders")
        .join(program)
        .join(file);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[test]
fn should_validate_every_shader() {
    for program in PROGRAMS {
        let vertex = read(program, "vertex.wgsl");
        let fragment = read(program, "fragment.wgsl");
        if let Err(e) = validate_wgsl(program, &vertex, ShaderStage::Vertex) {
            panic!("{}", e);
        }
        if let Err(e) = validate_wgsl(program, &fragment, ShaderStage::Fragment) {
            panic!("{}", e);
        }
    }
}

#[test]
fn should_report_syntax_errors_as_compile_errors() {
    let err = validate_wgsl("broken", "fn vs_main( {", ShaderStage::Vertex).unwrap_err();
    match err {
        ProgramError::Compile { label, stage, message } => {
            assert_eq!(label, "broken");
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn should_report_type_errors_as_compile_errors() {
    let source = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec3<f32>(1.0);\n}\n";
    let err = validate_wgsl("mistyped", source, ShaderStage::Fragment).unwrap_err();
    assert!(matches!(err, ProgramError::Compile { .. }));
}

#[test]
fn should_require_stage_entry_point() {
    let fragment_only = read("triangle", "fragment.wgsl");
    let err = validate_wgsl("triangle", &fragment_only, ShaderStage::Vertex).unwrap_err();
    assert!(matches!(err, ProgramError::Link { .. }));
    assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
    assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
}
