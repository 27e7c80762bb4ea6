use std::fs;
use std::path::Path;

use tempfile::TempDir;

use stagedag::engine::{Engine, RunSpec, TaskStatus};
use stagedag::graph::{Graph, Inputs, Invocation, Params};
use stagedag::store::{ArtifactStore, LocalStore};

#[test]
fn local_store_reports_presence_of_files_and_directories() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("table");
    let store = LocalStore;

    assert!(!store.exists(file.to_str().unwrap()));
    fs::write(&file, b"rows").unwrap();
    assert!(store.exists(file.to_str().unwrap()));
    assert!(store.exists(dir.path().to_str().unwrap()));
}

#[test]
fn engine_over_the_local_filesystem_is_incremental() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let mut graph = Graph::new("disk", &root);
    graph
        .add_task(
            "export",
            |call: &Invocation<'_>| -> anyhow::Result<()> {
                let path = Path::new(call.output_path);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, b"table")?;
                Ok(())
            },
            "out/export",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let engine = Engine::new();

    let first = engine.run(&[&graph], &RunSpec::everything()).unwrap();
    assert_eq!(first.status_of("export"), Some(TaskStatus::Done));
    assert!(dir.path().join("out/export").exists());

    let second = engine.run(&[&graph], &RunSpec::everything()).unwrap();
    assert_eq!(second.status_of("export"), Some(TaskStatus::Skipped));
}
