use couler_core::{container_output, extract_step_return, job_output, parse_argo_output, script_output, Argument,
                  InputParameter, Output, OutputKind, Resolved, StepOutputs, StepReturn, StepValue, TemplateError};
use serde_json::json;

#[test]
fn local_scalar_output_resolves_to_prefix_step_name() {
    let arg = Argument::from(Output::parameter("p", "s", "t"));
    assert_eq!(parse_argo_output(&arg, "steps"), Resolved::Value(json!("\"{{steps.s.p}}\"")));
    assert_eq!(parse_argo_output(&arg, "tasks"), Resolved::Value(json!("\"{{tasks.s.p}}\"")));
}

#[test]
fn global_output_resolves_to_workflow_placeholder() {
    let arg = Argument::from(Output::parameter("p", "s", "t").global());
    assert_eq!(parse_argo_output(&arg, "steps"), Resolved::Value(json!("\"{{workflow.outputs.parameters.p}}\"")));
}

#[test]
fn job_output_resolves_to_ordered_triple() {
    let job = job_output("run", "job-tmpl").job.unwrap();
    assert_eq!(parse_argo_output(&Argument::from(job.clone()), "steps"),
               Resolved::Triple(["\"{{steps.run.job-id}}\"".to_string(),
                                 "\"{{steps.run.job-name}}\"".to_string(),
                                 "\"{{steps.run.job-obj}}\"".to_string()]));
    assert_eq!(parse_argo_output(&Argument::from(job.global()), "steps"),
               Resolved::Triple(["\"{{workflow.outputs.parameters.job-id}}\"".to_string(),
                                 "\"{{workflow.outputs.parameters.job-name}}\"".to_string(),
                                 "\"{{workflow.outputs.parameters.job-obj}}\"".to_string()]));
}

#[test]
fn artifacts_and_parameters_pass_through() {
    let art = Output::artifact("a", "s", "t", "/a", json!({"name": "a"}));
    assert_eq!(parse_argo_output(&Argument::from(art.clone()), "steps"), Resolved::Artifact(art));
    let decl = InputParameter::new("x");
    assert_eq!(parse_argo_output(&Argument::from(decl.clone()), "steps"), Resolved::Parameter(decl.into()));
    assert_eq!(parse_argo_output(&Argument::from(json!(null)), "steps"), Resolved::Value(json!(null)));
    assert_eq!(parse_argo_output(&Argument::from(2.5), "steps"), Resolved::Value(json!("'2.5'")));
}

#[test]
fn step_return_prefers_script_then_parameters_then_artifacts() {
    let outputs = json!({
        "parameters": [{"name": "p", "valueFrom": {"path": "/p"}}],
        "artifacts": [{"name": "a", "path": "/a"}],
    });
    let mut bundle = container_output("s", "t", Some(&outputs)).unwrap();
    assert_eq!(extract_step_return(&StepValue::Outputs(bundle.clone())).unwrap(),
               StepReturn::Reference { name: "t".into(),
                                       id: "s".into(),
                                       output: "outputs.parameters.p".into() });

    bundle.parameters.clear();
    assert_eq!(extract_step_return(&StepValue::Outputs(bundle.clone())).unwrap(),
               StepReturn::Reference { name: "t".into(),
                                       id: "s".into(),
                                       output: "outputs.artifacts.a".into() });

    bundle.script = script_output("s", "t").script;
    assert_eq!(extract_step_return(&StepValue::Outputs(bundle)).unwrap(),
               StepReturn::Reference { name: "t".into(),
                                       id: "s".into(),
                                       output: "outputs.result".into() });
}

#[test]
fn step_return_for_job_and_literals() {
    let job = extract_step_return(&StepValue::Outputs(job_output("s", "t"))).unwrap();
    assert_eq!(job, StepReturn::Empty);
    assert_eq!(extract_step_return(&StepValue::Literal(json!(7))).unwrap(), StepReturn::Value(json!(7)));
    assert_eq!(extract_step_return(&StepValue::Outputs(StepOutputs::default())).unwrap(), StepReturn::Empty);
}

#[test]
fn step_return_with_too_few_segments_fails() {
    let mut out = Output::parameter("p", "s", "t");
    out.kind = OutputKind::Job { job_name: "a.b.c".into(),
                                              job_id: "a.b.d".into(),
                                              job_obj: "a.b.e".into() };
    let bundle = StepOutputs { parameters: vec![out],
                               ..Default::default() };
    let err = extract_step_return(&StepValue::Outputs(bundle)).unwrap_err();
    assert_eq!(err, TemplateError::InvalidStepReturn("a.b.c".into()));
}
