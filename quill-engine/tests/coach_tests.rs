mod common;

use common::ScriptedGenerator;
use quill_engine::*;

const CATALOG: &str = r#"
[coach-ai]
purpose = "An AI coach that helps programmers turn products into businesses"
personality = "Inventive, reflective, enjoys research"
preferences = "Programmer, little UI experience, likes encouragement"
event_logs = "Built the agent; connected the calendar plugin"
stage = "Agent and calendar data are not linked yet"
current_focus = ["calendar sync", "dashboard"]

[travel-guide]
purpose = "AI generated travel guides"
"#;

fn catalog() -> ProjectCatalog {
    toml::from_str(CATALOG).unwrap()
}

fn coach(backend: &ScriptedGenerator) -> Coach<&ScriptedGenerator> {
    Coach::with_retry(backend, RetryPolicy::immediate(3).unwrap())
}

#[test]
fn test_catalog_from_toml() {
    let catalog = catalog();
    assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["coach-ai", "travel-guide"]);

    let sparse = catalog.get("travel-guide").unwrap();
    assert_eq!(sparse.purpose, "AI generated travel guides");
    assert!(sparse.current_focus.is_empty());
    assert!(sparse.stage.is_empty());
}

#[test]
fn test_next_steps_prompt_carries_profile() {
    let backend = ScriptedGenerator::new().reply("  Ship the calendar sync today.  ");
    let catalog = catalog();

    let advice = coach(&backend).suggest_for(&catalog, "coach-ai", &[]).unwrap();

    assert_eq!(advice, "Ship the calendar sync today.");
    let prompt = &backend.calls()[0].prompt;
    assert!(prompt.contains("Project purpose: An AI coach"));
    assert!(prompt.contains("calendar sync\ndashboard"));
}

#[test]
fn test_focus_override() {
    let backend = ScriptedGenerator::new().reply("ok");
    let focus = vec!["talk to five users".to_string()];

    coach(&backend)
        .suggest_for(&catalog(), "coach-ai", &focus)
        .unwrap();

    let prompt = &backend.calls()[0].prompt;
    assert!(prompt.contains("talk to five users"));
    assert!(!prompt.contains("dashboard"));
}

#[test]
fn test_unknown_project() {
    let backend = ScriptedGenerator::new();
    let err = coach(&backend)
        .suggest_for(&catalog(), "missing", &[])
        .unwrap_err();

    assert!(matches!(err, CoachError::UnknownProject { ref key } if key == "missing"));
    assert_eq!(err.to_string(), "unknown project 'missing'");
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_stage_analysis_structured() {
    let backend = ScriptedGenerator::new().transient("busy").reply(
        "Sure! Here is my analysis:\n```json\n{\"stage\": {\"current_stage\": \"Pre-PMF\", \"confidence\": \"3\"}, \"priorities\": [\"talk to users\"]}\n```",
    );

    let analysis = coach(&backend)
        .analyze_stage("AI travel guide site", "only an idea so far")
        .unwrap();

    let StageAnalysis::Structured(value) = analysis else {
        panic!("expected structured analysis");
    };
    assert_eq!(value["stage"]["current_stage"], "Pre-PMF");
    assert_eq!(value["priorities"][0], "talk to users");
    assert_eq!(backend.call_count(), 2);
    assert!(backend.calls()[0].prompt.contains("only an idea so far"));
}

#[test]
fn test_stage_analysis_unparsed_keeps_raw_reply() {
    let backend = ScriptedGenerator::new().reply("Focus on talking to users.");

    let analysis = coach(&backend).analyze_stage("p", "i").unwrap();

    assert_eq!(
        analysis,
        StageAnalysis::Unparsed {
            raw: "Focus on talking to users.".to_string(),
            reason: "no JSON object in reply".to_string(),
        }
    );
}

#[test]
fn test_coach_generation_failure() {
    let backend = ScriptedGenerator::new().permanent("unauthorized");
    let err = coach(&backend).analyze_stage("p", "i").unwrap_err();
    assert!(matches!(err, CoachError::Generation(RetryError::Rejected(_))));
}
