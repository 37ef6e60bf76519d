use std::time::Duration;

use super::types::ContainerSpec;

/// Build the `docker run` arguments that create and start `spec` detached.
pub fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".into(),
        "--detach".into(),
        "--name".into(),
        spec.name.clone(),
        "--network".into(),
        spec.network.clone(),
        "--publish".into(),
        format!("{port}:{port}/tcp", port = spec.port),
        "--memory".into(),
        spec.memory_limit.clone(),
    ];

    // BTreeMap keeps the flag order stable between invocations.
    for (key, value) in &spec.env {
        args.push("--env".into());
        args.push(format!("{key}={value}"));
    }

    args.push(spec.image.clone());
    args
}

/// Build `docker stop` arguments; the daemon kills the container once
/// `timeout` elapses.
pub fn stop_args(name: &str, timeout: Duration) -> Vec<String> {
    vec![
        "stop".into(),
        "--time".into(),
        timeout.as_secs().to_string(),
        name.to_string(),
    ]
}

/// Build `docker rm` arguments. Forced so a container that ignored the stop
/// request still goes away.
pub fn remove_args(name: &str) -> Vec<String> {
    vec!["rm".into(), "--force".into(), name.to_string()]
}

/// Build `docker inspect` arguments that print only the state string.
pub fn inspect_args(name: &str) -> Vec<String> {
    vec![
        "inspect".into(),
        "--type".into(),
        "container".into(),
        "--format".into(),
        "{{.State.Status}}".into(),
        name.to_string(),
    ]
}
