use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn nbcell() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nbcell"));
    cmd.env_remove("NBCELL_CONFIG_FILE")
        .env_remove("NBCELL__RENDER__TRUSTED")
        .env_remove("NBCELL__RENDER__AUDIO_BASE_URL")
        .env_remove("NBCELL__RENDER__VECTOR_PLOT_MARKERS")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn renders_html_output_end_to_end() {
    nbcell()
        .arg("render")
        .arg(fixture("html_display.json"))
        .assert()
        .success()
        .stdout("<div><p>hi</p></div>\n");
}

#[test]
fn picks_the_richest_mime_type_by_default() {
    nbcell()
        .arg("render")
        .arg(fixture("png_execute_result.json"))
        .assert()
        .success()
        .stdout(
            "<div class=\"display\" style=\"overflow: scroll; background-color: white\">\
             <img style=\"height: 120px; width: 240px; max-width: none\" \
             src=\"data:image/png;base64,iVBORw0KGgo=\" /></div>\n",
        );
}

#[test]
fn explicit_mime_type_overrides_preference() {
    nbcell()
        .args(["render", "--mime-type", "text/plain"])
        .arg(fixture("png_execute_result.json"))
        .assert()
        .success()
        .stdout("<div><pre>&lt;Figure size 640x480 with 1 Axes&gt;</pre></div>\n");
}

#[test]
fn reads_output_from_stdin() {
    nbcell()
        .args(["render", "-"])
        .write_stdin(r#"{"output_type":"display_data","data":{"text/plain":"hello"},"metadata":{}}"#)
        .assert()
        .success()
        .stdout("<div><pre>hello</pre></div>\n");
}

#[test]
fn html_is_sanitised_unless_trusted() {
    let payload = r#"{"output_type":"display_data","data":{"text/html":"<b>x</b><script>1</script>"},"metadata":{}}"#;

    nbcell()
        .args(["render", "-"])
        .write_stdin(payload)
        .assert()
        .success()
        .stdout("<div><b>x</b></div>\n");

    nbcell()
        .args(["render", "-", "--trusted", "true"])
        .write_stdin(payload)
        .assert()
        .success()
        .stdout(contains("<script>1</script>"));
}

#[test]
fn trusted_can_come_from_environment() {
    nbcell()
        .args(["render", "-"])
        .env("NBCELL__RENDER__TRUSTED", "true")
        .write_stdin(r#"{"output_type":"display_data","data":{"text/html":"<script>1</script>"},"metadata":{}}"#)
        .assert()
        .success()
        .stdout(contains("<script>1</script>"));
}

#[test]
fn embedded_audio_is_rehosted_with_base_url() {
    nbcell()
        .arg("render")
        .arg(fixture("audio_display.json"))
        .args(["--audio-base-url", "https://example.com/nb/"])
        .assert()
        .success()
        .stdout(contains("<h2>Extracted audio:</h2>"))
        .stdout(contains(
            "<div class=\"audio-player\"><audio controls=\"\" preload=\"none\" \
             src=\"https://example.com/nb/clip.wav\"></audio></div></div>",
        ));
}

#[test]
fn vega_specs_get_a_white_background() {
    nbcell()
        .arg("render")
        .arg(fixture("vega_display.json"))
        .assert()
        .success()
        .stdout(contains("<div style=\"background-color: white\"><pre class=\"json\""));
}

#[test]
fn plot_markers_come_from_config_file() {
    let config = config_file("[render]\nvector_plot_markers = [\"application/x-plot\"]\n");

    nbcell()
        .arg("--config-file")
        .arg(config.path())
        .arg("render")
        .arg(fixture("vega_display.json"))
        .assert()
        .success()
        .stdout(contains("background-color").not());
}

#[test]
fn latex_is_typeset() {
    nbcell()
        .arg("render")
        .arg(fixture("latex_display.json"))
        .assert()
        .success()
        .stdout(contains("<div class=\"latex-output\">"))
        .stdout(contains("katex"));
}

#[test]
fn lists_mime_types_in_display_order() {
    nbcell()
        .arg("mime-types")
        .arg(fixture("png_execute_result.json"))
        .assert()
        .success()
        .stdout("image/png\ntext/plain\n");
}

#[test]
fn invalid_json_fails_with_source_name() {
    nbcell()
        .args(["render", "-"])
        .write_stdin("{ not json")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("failed to read `<stdin>`"));
}

#[test]
fn empty_bundle_has_nothing_to_render() {
    nbcell()
        .args(["render", "-"])
        .write_stdin(r#"{"output_type":"display_data","data":{},"metadata":{}}"#)
        .assert()
        .code(1)
        .stderr(contains("output has no data to render"));
}

#[test]
fn invalid_audio_base_url_is_rejected() {
    nbcell()
        .arg("render")
        .arg(fixture("audio_display.json"))
        .args(["--audio-base-url", "not a url"])
        .assert()
        .code(1)
        .stderr(contains("render.audio_base_url"));
}
