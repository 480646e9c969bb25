use wgpu::naga;

/// Everything that can go wrong between shader text and a usable compute
/// program. All variants are recoverable: the reload controller logs them
/// and gates dispatch off instead of terminating the process.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("shader parse failed:\n{0}")]
    Parse(String),
    #[error("shader validation failed:\n{0}")]
    Validate(String),
    #[error("shader declares no compute entry point")]
    MissingEntryPoint,
    #[error("work-group size {0}x{1} must be positive in both dimensions")]
    WorkgroupSize(u32, u32),
    #[error("compute pipeline creation failed: {0}")]
    Pipeline(String),
}

/// A parsed and validated compute shader, ready for module creation.
#[derive(Debug)]
pub struct ComputeShaderInfo {
    pub module: naga::Module,
    pub workgroup_size: (u32, u32),
}

/// Parses GLSL compute source, validates it, and reflects the declared
/// work-group size.
///
/// WebGPU has no equivalent of `GL_COMPUTE_WORK_GROUP_SIZE`, so the size is
/// read from the naga IR before the pipeline exists. Both dimensions must be
/// positive or the shader is rejected as a compile failure.
pub fn reflect(source: &str) -> Result<ComputeShaderInfo, CompileError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(naga::ShaderStage::Compute);
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| CompileError::Parse(errors.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|err| CompileError::Validate(err.emit_to_string(source)))?;

    let entry = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == naga::ShaderStage::Compute)
        .ok_or(CompileError::MissingEntryPoint)?;

    let [x, y, _] = entry.workgroup_size;
    if x == 0 || y == 0 {
        return Err(CompileError::WorkgroupSize(x, y));
    }

    let workgroup_size = (x, y);
    Ok(ComputeShaderInfo {
        module,
        workgroup_size,
    })
}

/// Work-group grid for a square output of `resolution` pixels.
///
/// Exact integer division: the resolution is required to be a multiple of
/// the work-group size, and any remainder would simply go unrendered.
pub fn dispatch_extent(resolution: u32, workgroup_size: (u32, u32)) -> (u32, u32) {
    (resolution / workgroup_size.0, resolution / workgroup_size.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_COMPUTE: &str = r#"
#version 450
layout(local_size_x = 8, local_size_y = 8) in;
layout(set = 0, binding = 0, rgba32f) uniform writeonly image2D out_image;

void main() {
    imageStore(out_image, ivec2(gl_GlobalInvocationID.xy), vec4(0.0, 0.0, 0.0, 1.0));
}
"#;

    #[test]
    fn reflects_declared_workgroup_size() {
        let info = reflect(VALID_COMPUTE).expect("valid shader reflects");
        assert_eq!(info.workgroup_size, (8, 8));
    }

    #[test]
    fn one_dimensional_workgroup_defaults_y_to_one() {
        let source = r#"
#version 450
layout(local_size_x = 64) in;
void main() {}
"#;
        let info = reflect(source).expect("1d shader reflects");
        assert_eq!(info.workgroup_size, (64, 1));
    }

    #[test]
    fn rejects_syntactically_invalid_source() {
        let err = reflect("void main( {").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn rejects_source_without_main() {
        let source = r#"
#version 450
float helper() { return 1.0; }
"#;
        assert!(reflect(source).is_err());
    }

    #[test]
    fn dispatch_uses_exact_integer_division() {
        assert_eq!(dispatch_extent(600, (8, 8)), (75, 75));
        assert_eq!(dispatch_extent(600, (16, 16)), (37, 37));
        assert_eq!(dispatch_extent(600, (600, 1)), (1, 600));
    }
}
