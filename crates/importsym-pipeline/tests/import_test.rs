//! End-to-end import tests against small header trees
//!
//! Tests that need the system preprocessor return early when `cpp` is not
//! on `PATH`.

use std::fs;
use std::path::PathBuf;

use importsym_core::{Config, Error};
use importsym_parser::preprocessor::CppPreprocessor;
use importsym_pipeline::{SymbolImporter, GENERATED_HEADER};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const TYPES_H: &str = r#"
#ifndef __PJ_TYPES_H__
#define __PJ_TYPES_H__

#include <stddef.h>

typedef int pj_status_t;
typedef int pj_bool_t;

enum pj_constants_
{
    PJ_SUCCESS = 0,
    PJ_TRUE = 1,
    PJ_FALSE = 0
};

typedef struct pj_str_t
{
    char *ptr;
    int slen;
} pj_str_t;

#endif
"#;

const SOCK_QOS_H: &str = r#"
#include <pj/types.h>

typedef enum pj_qos_type
{
    PJ_QOS_TYPE_BEST_EFFORT,
    PJ_QOS_TYPE_BACKGROUND,
    PJ_QOS_TYPE_VIDEO
} pj_qos_type;

typedef enum pj_qos_flag
{
    PJ_QOS_PARAM_HAS_DSCP = 1,
    PJ_QOS_PARAM_HAS_SO_PRIO = 2
} pj_qos_flag;
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pjlib/include/pj")).unwrap();
        fs::create_dir_all(dir.path().join("fake_libc")).unwrap();
        fs::write(dir.path().join("fake_libc/stddef.h"), "typedef unsigned int size_t;\n").unwrap();
        fs::write(dir.path().join("pjlib/include/pj/types.h"), TYPES_H).unwrap();
        fs::write(dir.path().join("pjlib/include/pj/sock_qos.h"), SOCK_QOS_H).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.paths.list_file = self.path("symbols.lst");
        config.paths.output_file = self.path("symbols.i");
        config.paths.unit_file = self.path("tmpsrc.h");
        config.paths.artifacts = vec![self.path("lextab.py"), self.path("yacctab.py")];
        config.preprocessor.project_root = self.dir.path().to_path_buf();
        config.preprocessor.include_dirs = vec!["pjlib/include".into()];
        config.preprocessor.fake_libc_dir = self.path("fake_libc");
        config
    }

    fn write_list(&self, content: &str) {
        fs::write(self.path("symbols.lst"), content).unwrap();
    }

    fn output(&self) -> String {
        fs::read_to_string(self.path("symbols.i")).unwrap()
    }
}

fn system_cpp() -> Option<CppPreprocessor> {
    CppPreprocessor::locate("cpp").ok()
}

fn importer_for(ws: &Workspace) -> Option<SymbolImporter> {
    system_cpp().map(|cpp| SymbolImporter::with_preprocessor(ws.config(), cpp))
}

#[test]
fn test_missing_preprocessor_fails_before_reading_list() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.preprocessor.program = "importsym-no-such-preprocessor".into();
    config.paths.list_file = ws.path("does-not-exist.lst");

    let err = SymbolImporter::new(config).err().unwrap();

    assert!(matches!(err, Error::Environment(_)));
    assert!(!ws.path("tmpsrc.h").exists());
}

#[test]
fn test_missing_fake_libc_fails() {
    if system_cpp().is_none() {
        return;
    }
    let ws = Workspace::new();
    let mut config = ws.config();
    config.preprocessor.fake_libc_dir = ws.path("no_fake_libc");

    let err = SymbolImporter::new(config).err().unwrap();
    assert!(err.to_string().contains("fake libc"));
}

#[test]
fn test_types_header_scenario() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("pj/types.h  pj_status_t  PJ_SUCCESS\n");

    let report = importer.run().unwrap();

    assert_eq!(
        ws.output(),
        format!("{}typedef int pj_status_t;\n\n", GENERATED_HEADER)
    );
    assert_eq!(report.written, vec!["pj_status_t"]);
    assert_eq!(report.missing, vec!["PJ_SUCCESS"]);
    assert_eq!(report.symbols, 2);
    assert_eq!(report.files, 1);
    assert!(!ws.path("tmpsrc.h").exists());
}

#[test]
fn test_request_order_across_headers() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("pj/sock_qos.h pj_qos_flag pj_qos_type\npj/types.h pj_str_t\n");

    importer.run().unwrap();

    assert_eq!(
        ws.output(),
        format!(
            "{}{}{}{}",
            GENERATED_HEADER,
            "typedef enum pj_qos_flag\n{\n  PJ_QOS_PARAM_HAS_DSCP = 1,\n  PJ_QOS_PARAM_HAS_SO_PRIO = 2\n} pj_qos_flag;\n\n",
            "typedef enum pj_qos_type\n{\n  PJ_QOS_TYPE_BEST_EFFORT,\n  PJ_QOS_TYPE_BACKGROUND,\n  PJ_QOS_TYPE_VIDEO\n} pj_qos_type;\n\n",
            "typedef struct pj_str_t\n{\n  char *ptr;\n  int slen;\n} pj_str_t;\n\n",
        )
    );
}

#[test]
fn test_empty_list_writes_header_only() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("\n\npj/types.h\n");

    let report = importer.run().unwrap();

    assert_eq!(ws.output(), GENERATED_HEADER);
    assert!(report.written.is_empty());
    assert!(report.missing.is_empty());
}

#[test]
fn test_runs_are_idempotent() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("pj/types.h pj_str_t pj_constants_ pj_bool_t\npj/sock_qos.h pj_qos_type\n");

    importer.run().unwrap();
    let first = ws.output();
    importer.run().unwrap();

    assert_eq!(ws.output(), first);
}

#[test]
fn test_parse_failure_leaves_output_untouched() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    fs::write(ws.path("pjlib/include/pj/broken.h"), "int ) broken ( ;\n").unwrap();
    fs::write(ws.path("symbols.i"), "previous output\n").unwrap();
    ws.write_list("pj/types.h pj_status_t\npj/broken.h broken\n");

    let err = importer.run().unwrap_err();

    assert!(err.is_parse_stage(), "unexpected error: {err}");
    assert!(err.to_string().contains("pj/broken.h:1:"), "unexpected error: {err}");
    assert_eq!(ws.output(), "previous output\n");
    assert!(ws.path("tmpsrc.h").exists());
}

#[test]
fn test_malformed_name_reported_missing() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("pj/types.h pj_status_t pj_str_t,\n");

    let report = importer.run().unwrap();

    assert_eq!(
        ws.output(),
        format!("{}typedef int pj_status_t;\n\n", GENERATED_HEADER)
    );
    assert_eq!(report.missing, vec!["pj_str_t,"]);
}

#[test]
fn test_inline_cast_keeps_typedef() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    fs::write(
        ws.path("pjlib/include/pj/ssize.h"),
        "typedef int pj_ssize_t;\nstatic int pj_widen(int n) { return (pj_ssize_t)n; }\n",
    )
    .unwrap();
    ws.write_list("pj/ssize.h pj_ssize_t\n");

    importer.run().unwrap();

    assert_eq!(
        ws.output(),
        format!("{}typedef int pj_ssize_t;\n\n", GENERATED_HEADER)
    );
}

#[test]
fn test_missing_header_is_preprocess_error() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    ws.write_list("pj/absent.h pj_nothing\n");

    let err = importer.run().unwrap_err();

    assert!(matches!(err, Error::Preprocess(_)), "unexpected error: {err}");
    assert!(!ws.path("symbols.i").exists());
}

#[test]
fn test_cleanup_removes_artifacts() {
    let ws = Workspace::new();
    let Some(importer) = importer_for(&ws) else {
        return;
    };
    fs::write(ws.path("yacctab.py"), "# generated\n").unwrap();

    importer.cleanup();

    assert!(!ws.path("yacctab.py").exists());
    assert!(!ws.path("lextab.py").exists());
}
