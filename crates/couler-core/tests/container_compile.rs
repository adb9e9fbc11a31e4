//! Compilación de templates de contenedor: parámetros implícitos, artifacts,
//! entorno, recursos y override de GPU.

use couler_core::model::{ConfigMapRef, ImagePullPolicy, VolumeMount};
use couler_core::{job_output, Argument, ArgumentsParameter, CompilerConfig, Container, InputParameter, IoItem, Output,
                  Secret, Template, TemplateBase, TemplateError};
use indexmap::IndexMap;
use serde_json::{json, Value};

fn container(name: &str) -> Container {
    Container::new(TemplateBase::new(name), "alpine:3.19").command(["sh", "-c"])
}

fn param_names(manifest: &serde_json::Map<String, Value>) -> Vec<String> {
    manifest["inputs"]["parameters"].as_array()
                                    .expect("inputs.parameters")
                                    .iter()
                                    .map(|p| p["name"].as_str().unwrap_or_default().to_string())
                                    .collect()
}

#[test]
fn plain_literals_synthesize_one_parameter_each_in_order() {
    let c = container("echo").arg("hello").arg(42i64).arg(true);
    let m = c.compile(&CompilerConfig::default()).expect("compile");
    assert_eq!(param_names(&m), vec!["para-echo-0", "para-echo-1", "para-echo-2"]);
    assert_eq!(m["container"]["args"],
               json!(["\"{{inputs.parameters.para-echo-0}}\"",
                      "\"{{inputs.parameters.para-echo-1}}\"",
                      "\"{{inputs.parameters.para-echo-2}}\""]));
}

#[test]
fn job_reference_takes_three_slots_and_advances_index() {
    let job = job_output("create-job", "job-tmpl").job.expect("job handle");
    let c = container("consume").arg(job).arg("after");
    let m = c.compile(&CompilerConfig::default()).unwrap();
    assert_eq!(param_names(&m), vec!["para-consume-0", "para-consume-1", "para-consume-2", "para-consume-3"]);
}

#[test]
fn explicit_parameters_pass_through_without_consuming_a_slot() {
    let c = container("mixed").arg("a")
                              .arg(InputParameter::new("threshold").with_default("0.5"))
                              .arg(ArgumentsParameter::new("mode", "fast"))
                              .arg("b");
    let m = c.compile(&CompilerConfig::default()).unwrap();
    assert_eq!(m["inputs"]["parameters"],
               json!([
                   {"name": "para-mixed-0"},
                   {"name": "threshold", "default": "0.5"},
                   {"name": "mode", "value": "fast"},
                   {"name": "para-mixed-1"},
               ]));
    let args = m["container"]["args"].as_array().unwrap();
    assert!(args.contains(&json!("\"{{inputs.parameters.threshold}}\"")));
    assert_eq!(args.len(), 4);
}

#[test]
fn artifact_arguments_are_not_parameters() {
    let art = Output::artifact("model", "train", "trainer", "/out/model", json!({"name": "model", "path": "/out/model"}));
    let c = container("eval").arg(art).arg("x");
    let m = c.compile(&CompilerConfig::default()).unwrap();
    assert_eq!(param_names(&m), vec!["para-eval-0"]);
    assert_eq!(m["container"]["args"], json!(["\"{{inputs.parameters.para-eval-0}}\""]));
}

#[test]
fn input_artifacts_are_deduplicated_by_name() {
    let first = Output::artifact("data", "s1", "t1", "/tmp/data", json!({"name": "data", "path": "/tmp/data"}));
    let dup = Output::artifact("data", "s2", "t2", "/other/data", json!({"name": "data", "path": "/other/data"}));
    let other = Output::artifact("extra", "s2", "t2", "/tmp/extra", json!({"name": "extra", "path": "/tmp/extra"}));
    let base = TemplateBase::new("merge").with_input(vec![IoItem::from(first), IoItem::from(dup), IoItem::from(other)])
                                         .expect("input classification");
    let m = Container::new(base, "busybox").compile(&CompilerConfig::default()).unwrap();
    assert_eq!(m["inputs"]["artifacts"],
               json!([{"name": "data", "path": "/tmp/data"}, {"name": "extra", "path": "/tmp/extra"}]));
    assert!(m["inputs"].get("parameters").is_none());
}

#[test]
fn requests_and_limits_are_independent_copies() {
    let c = container("res").resource("cpu", "500m").resource("memory", "1Gi");
    let mut m = c.compile(&CompilerConfig::default()).unwrap();
    let resources = m["container"]["resources"].clone();
    assert_eq!(resources["requests"], resources["limits"]);

    if let Some(Value::Object(container)) = m.get_mut("container") {
        container["resources"]["requests"]["cpu"] = json!("2");
    }
    assert_eq!(m["container"]["resources"]["limits"]["cpu"], json!("500m"));
    assert_eq!(m["container"]["resources"]["requests"]["cpu"], json!("2"));
}

#[test]
fn gpu_envs_are_injected_only_without_gpu_and_with_switch_on() {
    let on = CompilerConfig::default().with_gpu_env_override(true);
    let off = CompilerConfig::default();

    let cpu_only = container("cpu").resource("cpu", 1);
    let m = cpu_only.compile(&on).unwrap();
    assert_eq!(m["container"]["env"],
               json!([{"name": "NVIDIA_VISIBLE_DEVICES", "value": ""},
                      {"name": "NVIDIA_DRIVER_CAPABILITIES", "value": ""}]));
    assert!(cpu_only.compile(&off).unwrap()["container"].get("env").is_none());

    let gpu = container("gpu").resource("nvidia.com/gpu", 1);
    assert!(gpu.compile(&on).unwrap()["container"].get("env").is_none());
    assert!(gpu.compile(&off).unwrap()["container"].get("env").is_none());
}

#[test]
fn gpu_override_keeps_user_env_first() {
    let on = CompilerConfig::default().with_gpu_env_override(true);
    let c = container("envs").env("LOG_LEVEL", "debug").env("NVIDIA_VISIBLE_DEVICES", "all");
    let m = c.compile(&on).unwrap();
    assert_eq!(m["container"]["env"],
               json!([{"name": "LOG_LEVEL", "value": "debug"},
                      {"name": "NVIDIA_VISIBLE_DEVICES", "value": ""},
                      {"name": "NVIDIA_DRIVER_CAPABILITIES", "value": ""}]));
    // la configuración del autor no se modifica al compilar
    assert_eq!(c.env.as_ref().map(IndexMap::len), Some(2));
}

#[test]
fn secret_entries_extend_or_become_env() {
    let mut data = IndexMap::new();
    data.insert("TOKEN".to_string(), "t".to_string());
    let secret = Secret::new("default", data).with_name("creds");
    let token = json!({"name": "TOKEN", "valueFrom": {"secretKeyRef": {"name": "creds", "key": "TOKEN"}}});

    let only_secret = container("s1").secret(secret.clone());
    assert_eq!(only_secret.compile(&CompilerConfig::default()).unwrap()["container"]["env"],
               json!([token.clone()]));

    let both = container("s2").env("A", 1).secret(secret);
    assert_eq!(both.compile(&CompilerConfig::default()).unwrap()["container"]["env"],
               json!([{"name": "A", "value": "1"}, token]));
}

#[test]
fn non_secret_source_in_secret_slot_fails_before_any_manifest() {
    let c = container("bad").secret(ConfigMapRef::new("settings", vec!["A".into()]));
    let err = c.compile(&CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, TemplateError::Validation(_)), "unexpected error: {err:?}");
}

#[test]
fn full_container_manifest_shape() {
    let base = TemplateBase::new("train").with_timeout(3600)
                                         .with_output(Output::parameter("loss", "", "train").with_path("/tmp/loss"))
                                         .unwrap();
    let c = Container::new(base, "python:3.11").command("python")
                                               .arg("train.py")
                                               .env_from(ConfigMapRef::new("settings", vec![]).env_from_entry())
                                               .image_pull_policy(ImagePullPolicy::IfNotPresent)
                                               .volume_mount(VolumeMount::new("data", "/data").read_only())
                                               .working_dir("/work")
                                               .node_selector("pool", "cpu");
    let m = c.compile(&CompilerConfig::default()).unwrap();
    let keys: Vec<&str> = m.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "activeDeadlineSeconds", "inputs", "nodeSelector", "container", "outputs"]);
    assert_eq!(Value::Object(m.clone()),
               json!({
                   "name": "train",
                   "activeDeadlineSeconds": 3600,
                   "inputs": {"parameters": [{"name": "para-train-0"}]},
                   "nodeSelector": {"pool": "cpu"},
                   "container": {
                       "image": "python:3.11",
                       "command": ["python"],
                       "args": ["\"{{inputs.parameters.para-train-0}}\""],
                       "envFrom": [{"configMapRef": {"name": "settings"}}],
                       "imagePullPolicy": "IfNotPresent",
                       "volumeMounts": [{"name": "data", "mountPath": "/data", "readOnly": true}],
                       "workingDir": "/work",
                   },
                   "outputs": {"parameters": [{"name": "loss", "valueFrom": {"path": "/tmp/loss"}}]},
               }));
    assert_eq!(c.get_volume_mounts().len(), 1);
}

#[test]
fn compile_is_repeatable() {
    let c = container("same").arg(Argument::from("x")).resource("cpu", 1);
    let cfg = CompilerConfig::default().with_gpu_env_override(true);
    assert_eq!(c.compile(&cfg).unwrap(), c.compile(&cfg).unwrap());
}

#[test]
fn repeated_input_parameter_names_are_rejected() {
    let twice = container("t").arg(InputParameter::new("x")).arg(InputParameter::new("x"));
    assert_eq!(twice.compile(&CompilerConfig::default()).unwrap_err(),
               TemplateError::DuplicateName { bucket: "input parameters".into(),
                                              name: "x".into() });

    // un parámetro explícito no puede ocupar el nombre de un slot implícito
    let clash = container("t").arg(InputParameter::new("para-t-0")).arg("lit");
    assert_eq!(clash.compile(&CompilerConfig::default()).unwrap_err(),
               TemplateError::DuplicateName { bucket: "input parameters".into(),
                                              name: "para-t-0".into() });
}
