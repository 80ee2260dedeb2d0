//! Compiling and linking the extension module from a generated source.
//!
//! The C compiler is the host's own; the link step is answered by the
//! scripted runner.

mod common;

use common::{Project, ScriptedRunner, host_compiler_available, is_link};
use py3ode_setup::{Error, Setup};

#[test]
fn build_links_module_into_lib_dir_and_stages_helpers() {
    let mut project = Project::new();
    project.use_host_toolchain();
    if !host_compiler_available(&project.cfg) {
        println!("Skipping module build test: no C compiler for {}", project.cfg.target);
        return;
    }
    let runner = ScriptedRunner::default();

    let built = Setup::new(&project.cfg, &runner).build().unwrap();

    let lib_dir = project.cfg.lib_dir();
    assert_eq!(built.module, lib_dir.join("ode.so"));
    assert!(built.module.is_file());

    let calls = runner.calls.borrow();
    let last = calls.last().unwrap();
    assert!(is_link(last), "last call was {last}");
    assert_eq!(calls.iter().filter(|c| is_link(c)).count(), 1);
    assert!(last.args.iter().any(|a| a.ends_with(".o")));
    assert!(last.args.contains(&format!("-L{}", project.path("ode/lib").display())));
    assert!(last.args.iter().any(|a| a == "-lode"));
    drop(calls);

    assert!(lib_dir.join("xode").join("__init__.py").is_file());
    assert!(lib_dir.join("xode").join("parser.py").is_file());
    assert_eq!(built.helpers.len(), 2);
    assert!(built.helpers.iter().all(|h| h.starts_with(lib_dir.join("xode"))));
}

#[test]
fn failing_link_stages_no_helpers() {
    let mut project = Project::new();
    project.use_host_toolchain();
    if !host_compiler_available(&project.cfg) {
        println!("Skipping module build test: no C compiler for {}", project.cfg.target);
        return;
    }
    let runner = ScriptedRunner {
        link_status: 1,
        ..ScriptedRunner::default()
    };

    let err = Setup::new(&project.cfg, &runner).build().unwrap_err();

    match &err {
        Error::CommandFailed { status, .. } => assert_eq!(*status, 1),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(runner.link_call().is_some());
    let lib_dir = project.cfg.lib_dir();
    assert!(!lib_dir.join("ode.so").exists());
    assert!(!lib_dir.join("xode").exists());
}
