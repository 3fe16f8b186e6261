use super::harness::{MockRegistry, TestContext, parse_json};

pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&TestContext) -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "help_output",
            run: scenario_help,
        },
        Scenario {
            name: "no_args_error",
            run: scenario_no_args,
        },
        Scenario {
            name: "end_to_end_count",
            run: scenario_end_to_end,
        },
        Scenario {
            name: "silent_hides_progress",
            run: scenario_silent,
        },
        Scenario {
            name: "diamond_parallel",
            run: scenario_diamond_parallel,
        },
        Scenario {
            name: "cycle_terminates",
            run: scenario_cycle,
        },
        Scenario {
            name: "skip_peer",
            run: scenario_skip_peer,
        },
        Scenario {
            name: "skip_optional_from_config",
            run: scenario_skip_optional_config,
        },
        Scenario {
            name: "root_not_found",
            run: scenario_root_not_found,
        },
        Scenario {
            name: "dependency_not_found",
            run: scenario_dependency_not_found,
        },
        Scenario {
            name: "dependency_decode_error",
            run: scenario_dependency_decode_error,
        },
        Scenario {
            name: "aliased_root_version",
            run: scenario_aliased_root,
        },
        Scenario {
            name: "fallback_latest",
            run: scenario_fallback_latest,
        },
        Scenario {
            name: "json_output",
            run: scenario_json,
        },
        Scenario {
            name: "list_output",
            run: scenario_list,
        },
        Scenario {
            name: "invalid_registry_url",
            run: scenario_invalid_registry,
        },
    ]
}

/// `root@latest -> {A: 1.0.0, B: ^1.0.0}`, `B@1.0.0 -> {A: 1.0.0}`
fn example_registry() -> Result<MockRegistry, String> {
    MockRegistry::start(&[
        (
            "root/latest",
            r#"{"name": "root", "dependencies": {"A": "1.0.0", "B": "^1.0.0"}}"#,
        ),
        ("A/1.0.0", r#"{"name": "A"}"#),
        ("B/1.0.0", r#"{"name": "B", "dependencies": {"A": "1.0.0"}}"#),
    ])
}

fn scenario_help(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("help")?;
    let output = ctx.run_lsdeps(&env, &["--help"])?;
    output.assert_success()?;
    output.assert_stdout_contains("--skip-peer")?;
    output.assert_stdout_contains("--skip-optional")?;
    Ok(())
}

fn scenario_no_args(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("no-args")?;
    let output = ctx.run_lsdeps(&env, &[])?;
    output.assert_failure()?;
    output.assert_stderr_contains("<PACKAGE>")?;
    Ok(())
}

fn scenario_end_to_end(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("end-to-end")?;
    let registry = example_registry()?;
    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Name: root")?;
    output.assert_stdout_contains("URL: https://npmjs.com/package/root/v/latest")?;
    output.assert_stdout_contains("Dependency count: 2")?;
    output.assert_stderr_contains("Fetching dependencies for root@latest")?;
    output.assert_stderr_contains("Fetching dependencies for B@^1.0.0")?;
    if registry.hits("A/1.0.0") != 1 {
        return Err(format!(
            "Expected A/1.0.0 to be fetched once, got {}",
            registry.hits("A/1.0.0")
        ));
    }
    Ok(())
}

fn scenario_silent(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("silent")?;
    let registry = example_registry()?;
    let output = ctx.run_lsdeps(&env, &["root", "--silent", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 2")?;
    output.assert_stderr_not_contains("Fetching dependencies")?;
    Ok(())
}

fn scenario_diamond_parallel(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("diamond")?;
    let registry = MockRegistry::start(&[
        (
            "root/latest",
            r#"{"dependencies": {"A": "1.0.0", "B": "1.0.0"}}"#,
        ),
        ("A/1.0.0", r#"{"dependencies": {"C": "1.0.0"}}"#),
        ("B/1.0.0", r#"{"dependencies": {"C": "1.0.0"}}"#),
        ("C/1.0.0", r#"{}"#),
    ])?;
    let output = ctx.run_lsdeps(&env, &["root", "-j", "4", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 3")?;
    if registry.hits("C/1.0.0") != 1 {
        return Err(format!(
            "Expected C/1.0.0 to be fetched once, got {}",
            registry.hits("C/1.0.0")
        ));
    }
    Ok(())
}

fn scenario_cycle(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("cycle")?;
    let registry = MockRegistry::start(&[
        (
            "root/latest",
            r#"{"dependencies": {"A": "1.0.0", "root": "^1.0.0"}}"#,
        ),
        ("A/1.0.0", r#"{"dependencies": {"B": "1.0.0"}}"#),
        ("B/1.0.0", r#"{"dependencies": {"A": "1.0.0", "root": "1.0.0"}}"#),
    ])?;
    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 2")?;
    if registry.hits("root/1.0.0") != 0 {
        return Err("Root package should never be expanded as a dependency".to_string());
    }
    Ok(())
}

fn scenario_skip_peer(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("skip-peer")?;
    let registry = MockRegistry::start(&[
        (
            "root/latest",
            r#"{"dependencies": {"A": "1.0.0"}, "peerDependencies": {"react": "^18.0.0"}}"#,
        ),
        (
            "A/1.0.0",
            r#"{"dependencies": {"B": "1.0.0"}, "peerDependencies": {"B": "1.0.0", "P": "1.0.0"}}"#,
        ),
        ("B/1.0.0", r#"{}"#),
        ("P/1.0.0", r#"{}"#),
        ("react/18.0.0", r#"{}"#),
    ])?;

    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 4")?;

    let output = ctx.run_lsdeps(&env, &["root", "-p", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 2")?;
    Ok(())
}

fn scenario_skip_optional_config(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("skip-optional")?;
    let registry = MockRegistry::start(&[
        (
            "root/latest",
            r#"{"dependencies": {"A": "1.0.0"}, "optionalDependencies": {"fsevents": "~2.3.2"}}"#,
        ),
        ("A/1.0.0", r#"{}"#),
        ("fsevents/2.3.2", r#"{}"#),
    ])?;
    env.write_config(&format!(
        r#"{{"registry": "{}", "skip_optional": true}}"#,
        registry.url
    ))?;

    let output = ctx.run_lsdeps(&env, &["root"])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 1")?;
    Ok(())
}

fn scenario_root_not_found(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("root-not-found")?;
    let registry = example_registry()?;
    let output = ctx.run_lsdeps(&env, &["missing", "-v", "1.0.0", "--registry", &registry.url])?;
    output.assert_failure()?;
    output.assert_stderr_contains("missing@1.0.0 not found")?;
    output.assert_stdout_not_contains("Dependency count")?;
    Ok(())
}

fn scenario_dependency_not_found(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("dep-not-found")?;
    let registry = MockRegistry::start(&[
        (
            "root/latest",
            r#"{"dependencies": {"gone": "1.0.0", "B": "1.0.0"}}"#,
        ),
        ("B/1.0.0", r#"{"dependencies": {"C": "1.0.0"}}"#),
        ("C/1.0.0", r#"{}"#),
    ])?;
    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 3")?;
    output.assert_stderr_contains("Package gone@1.0.0 does not exist")?;
    Ok(())
}

fn scenario_dependency_decode_error(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("dep-decode")?;
    let registry = MockRegistry::start(&[
        ("root/latest", r#"{"dependencies": {"A": "1.0.0"}}"#),
        ("A/1.0.0", "<html>"),
    ])?;
    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 1")?;
    output.assert_stderr_contains("Error fetching dependencies for A@1.0.0")?;
    Ok(())
}

fn scenario_aliased_root(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("aliased-root")?;
    let registry = MockRegistry::start(&[
        (
            "real/2.0.0",
            r#"{"dependencies": {"A": "npm:inner@^1.0.0"}}"#,
        ),
        ("inner/1.0.0", r#"{}"#),
    ])?;
    let output = ctx.run_lsdeps(
        &env,
        &["alias", "--version", "npm:real@^2.0.0", "--registry", &registry.url],
    )?;
    output.assert_success()?;
    output.assert_stdout_contains("Name: real")?;
    output.assert_stdout_contains("Dependency count: 1")?;
    if registry.hits("inner/1.0.0") != 1 {
        return Err("Aliased dependency should be fetched by its real name".to_string());
    }
    Ok(())
}

fn scenario_fallback_latest(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("fallback")?;
    let registry = MockRegistry::start(&[
        ("root/latest", r#"{"dependencies": {"A": "9.9.9"}}"#),
        ("A/latest", r#"{"dependencies": {"B": "1.0.0"}}"#),
        ("B/1.0.0", r#"{}"#),
    ])?;

    let output = ctx.run_lsdeps(&env, &["root", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 1")?;

    let output = ctx.run_lsdeps(
        &env,
        &["root", "--fallback-latest", "--registry", &registry.url],
    )?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependency count: 2")?;
    Ok(())
}

fn scenario_json(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("json")?;
    let registry = example_registry()?;
    let output = ctx.run_lsdeps(&env, &["root", "--json", "--registry", &registry.url])?;
    output.assert_success()?;

    let json = parse_json(&output.stdout)?;
    if json["name"] != "root" || json["count"] != 2 {
        return Err(format!("Unexpected JSON report: {}", json));
    }
    if json["dependencies"] != serde_json::json!(["A", "B"]) {
        return Err(format!("Unexpected dependency list: {}", json["dependencies"]));
    }
    Ok(())
}

fn scenario_list(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("list")?;
    let registry = example_registry()?;
    let output = ctx.run_lsdeps(&env, &["root", "--list", "--registry", &registry.url])?;
    output.assert_success()?;
    output.assert_stdout_contains("Dependencies:\n  A\n  B\n")?;
    Ok(())
}

fn scenario_invalid_registry(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("invalid-registry")?;
    let output = ctx.run_lsdeps(&env, &["root", "--registry", "localhost:4873"])?;
    output.assert_failure()?;
    output.assert_stderr_contains("Invalid registry URL")?;
    Ok(())
}
