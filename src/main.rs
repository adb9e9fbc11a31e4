use couler_core::model::{Cache, ImagePullPolicy, RetryStrategy};
use couler_core::{container_output, extract_step_return, job_output, parse_argo_output, CompilerConfig, Container,
                  InputParameter, Job, Manifest, Output, Resolved, StepValue, Template, TemplateBase, TemplateError};
use serde_json::{to_string_pretty, Value};

const JOB_MANIFEST: &str = "apiVersion: batch/v1
kind: Job
metadata:
  generateName: preprocess-
spec:
  template:
    spec:
      containers:
      - name: main
        image: busybox
        command: [sh, -c, 'echo ok']
      restartPolicy: Never
";

fn print_manifest(label: &str, manifest: &Manifest) -> Result<(), TemplateError> {
    println!("[{label}]\n{}", to_string_pretty(manifest)?);
    Ok(())
}

fn run() -> Result<(), TemplateError> {
    let config = CompilerConfig::from_env();
    println!("config: gpu override={} prefix={}", config.overwrite_gpu_envs, config.placeholder_prefix);

    // Step 1: contenedor que produce un parámetro
    let train_base = TemplateBase::new("train").with_timeout(3600)
                                               .with_retry(RetryStrategy::from_limit(2))
                                               .with_output(Output::parameter("loss", "", "train").with_path("/tmp/loss"))?;
    let train = Container::new(train_base, "python:3.11").command(["python", "train.py"])
                                                         .arg("--epochs")
                                                         .arg(10i64)
                                                         .resource("cpu", "2")
                                                         .image_pull_policy(ImagePullPolicy::IfNotPresent);
    let train_manifest = train.compile(&config)?;
    print_manifest("train", &train_manifest)?;
    let train_outputs = container_output("train-step", train.name(), train_manifest.get("outputs"))?;

    // Step 2: acción sobre un recurso del cluster
    let job = Job::new(TemplateBase::new("preprocess").with_cache(Cache::new("demo-cache", "preprocess", "1h")),
                       "create",
                       JOB_MANIFEST).success_condition("status.succeeded > 0")
                                    .failure_condition("status.failed > 0");
    print_manifest("preprocess", &job.compile(&config)?)?;
    let job_outputs = job_output("preprocess-step", job.name());

    // Step 3: consumidor de ambos
    let mut consumer = Container::new(TemplateBase::new("report"), "alpine:3.19").command("sh")
                                                                                .arg(InputParameter::new("title").with_default("demo"));
    for output in train_outputs.parameters.iter().chain(job_outputs.job.iter()) {
        consumer = consumer.arg(output.clone());
    }
    print_manifest("report", &consumer.compile(&config)?)?;

    // Valores que el orquestador sustituiría en los argumentos del step consumidor
    for arg in &consumer.args {
        match parse_argo_output(arg, &config.placeholder_prefix) {
            Resolved::Value(Value::String(v)) => println!("arg value: {v}"),
            Resolved::Value(v) => println!("arg value: {v}"),
            Resolved::Triple(parts) => println!("arg job triple: {}", parts.join(", ")),
            Resolved::Artifact(o) => println!("arg artifact: {}", o.name),
            Resolved::Parameter(p) => println!("arg parameter: {}", p.name()),
        }
    }

    let ret = extract_step_return(&StepValue::Outputs(train_outputs))?;
    println!("train step return: {ret:?}");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("couler-demo: {e}");
        std::process::exit(1);
    }
}
