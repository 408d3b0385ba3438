use std::fs;
use std::path::Path;

use cl3w_gen::{GenerateConfig, Indent};
use indoc::indoc;
use tempfile::TempDir;

const REGISTRY: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <registry>
        <feature api="opencl" name="CL_VERSION_1_0" number="1.0">
            <require>
                <command name="clGetPlatformIDs"/>
                <command name="clCreateContext"/>
            </require>
        </feature>
        <feature api="opencl" name="CL_VERSION_2_0" number="2.0">
            <require>
                <command name="clCreatePipe"/>
            </require>
        </feature>
        <extensions>
            <extension name="cl_khr_gl_sharing" supported="opencl">
                <require>
                    <command name="clCreateFromGLBufferKHR"/>
                </require>
            </extension>
        </extensions>
        <commands>
            <command>
                <proto><type>cl_int</type> <name>clGetPlatformIDs</name></proto>
                <param><type>cl_uint</type> <name>num_entries</name></param>
                <param><type>cl_platform_id</type>* <name>platforms</name></param>
            </command>
            <command>
                <proto><type>cl_context</type> <name>clCreateContext</name></proto>
                <param>const <type>cl_context_properties</type>* <name>properties</name></param>
                <param><type>cl_int</type>* <name>errcode_ret</name></param>
            </command>
            <command>
                <proto><type>cl_mem</type> <name>clCreatePipe</name></proto>
                <param><type>cl_context</type> <name>context</name></param>
                <param><type>cl_int</type>* <name>errcode_ret</name></param>
            </command>
            <command>
                <proto><type>cl_mem</type> <name>clCreateFromGLBufferKHR</name></proto>
                <param><type>cl_context</type> <name>context</name></param>
            </command>
        </commands>
    </registry>
"#};

fn write_registry(dir: &Path) -> String {
    let path = dir.join("cl.xml");
    fs::write(&path, REGISTRY).unwrap();
    path.to_string_lossy().into_owned()
}

fn base_config(dir: &TempDir) -> GenerateConfig {
    GenerateConfig {
        root: dir.path().join("out"),
        cl_xml: write_registry(dir.path()),
        cl_std: "1.0".to_string(),
        cl_ext: None,
        indent: Indent::Four,
        template_dir: None,
        no_header: false,
        no_license: false,
    }
}

#[test]
fn generates_header_and_source() {
    let dir = TempDir::new().unwrap();
    let config = base_config(&dir);
    cl3w_gen::run(&config).unwrap();

    let header = fs::read_to_string(config.root.join("include/cl3w.h")).unwrap();
    let source = fs::read_to_string(config.root.join("src/cl3w.c")).unwrap();

    assert!(header.starts_with("/*\n * This file was generated with cl3w-gen"));
    assert!(header.contains("Do What The Fuck You Want To"));
    assert!(header.contains("#define CL3W_API_COUNT 2"));
    assert!(header.contains(
        "typedef cl_context (CL_API_CALL CL_API_ENTRYP PFNCLCREATECONTEXTFUNC)(const cl_context_properties* properties, cl_int* errcode_ret);"
    ));
    assert!(header.contains("cl3w_get_clGetPlatformIDs"));
    assert!(header.contains("#define clCreateContext"));

    assert!(source.contains("\"clGetPlatformIDs\","));
    assert!(source.contains("clCreateContextDummyImpl"));
    assert!(source.contains("*errcode_ret = CL_INVALID_HOST_PTR;"));
    assert!(source.contains("return cl3w_get_clCreateContext()(properties, errcode_ret);"));
    assert!(source.contains("/* clCreateContext */"));
    // version 2.0 and extension commands stay out at ceiling 1.0
    assert!(!header.contains("clCreatePipe"));
    assert!(!header.contains("clCreateFromGLBufferKHR"));
}

#[test]
fn generation_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let config = base_config(&dir);
    cl3w_gen::run(&config).unwrap();
    let first = fs::read_to_string(config.root.join("include/cl3w.h")).unwrap();
    cl3w_gen::run(&config).unwrap();
    let second = fs::read_to_string(config.root.join("include/cl3w.h")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn extension_patterns_pull_in_extension_commands() {
    let dir = TempDir::new().unwrap();
    let mut config = base_config(&dir);
    let ext_file = dir.path().join("exts.txt");
    fs::write(&ext_file, "# GL interop\ncl_khr_*\n").unwrap();
    config.cl_ext = Some(ext_file);
    cl3w_gen::run(&config).unwrap();

    let header = fs::read_to_string(config.root.join("include/cl3w.h")).unwrap();
    assert!(header.contains("clCreateFromGLBufferKHR"));
    assert!(header.contains("#define CL3W_API_COUNT 3"));
}

#[test]
fn no_header_flag_drops_the_notice() {
    let dir = TempDir::new().unwrap();
    let mut config = base_config(&dir);
    config.no_header = true;
    cl3w_gen::run(&config).unwrap();
    let header = fs::read_to_string(config.root.join("include/cl3w.h")).unwrap();
    assert!(header.starts_with("#ifndef __cl3w_h_"));
}

#[test]
fn unknown_version_ceiling_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let mut config = base_config(&dir);
    config.cl_std = "4.0".to_string();
    let err = cl3w_gen::run(&config).unwrap_err();
    assert!(err.to_string().contains("4.0"));
    assert!(!config.root.join("include/cl3w.h").exists());
}

#[test]
fn duplicated_template_marker_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let mut config = base_config(&dir);

    let template_dir = dir.path().join("templates");
    fs::create_dir_all(&template_dir).unwrap();
    fs::write(
        template_dir.join("cl3w.h"),
        "/* generated typedefs */\n/* generated typedefs */\n/* generated api table */\n/* generated defines */\n",
    )
    .unwrap();
    fs::write(
        template_dir.join("cl3w.c"),
        "/* generated api names */\n/* generated stub dummies */\n/* generated stub impls */\n/* generated reset apis */\n/* generated probe api name */\n",
    )
    .unwrap();
    config.template_dir = Some(template_dir);

    let err = cl3w_gen::run(&config).unwrap_err();
    assert!(err.to_string().contains("typedefs"));
    assert!(!config.root.join("include/cl3w.h").exists());
    assert!(!config.root.join("src/cl3w.c").exists());
}
