use std::sync::Arc;
use std::time::Duration;

use alingo_core::model::{CourseId, Exercise, ExerciseId};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use remote::{InMemoryCourse, Remote};
use services::{DrillConfig, DrillPhase, DrillSnapshot};

use super::{DrillPanel, DrillView};
use crate::context::{UiApp, build_app_context};
use crate::vm::{DrillVm, map_drill_snapshot};

struct TestApp {
    course: InMemoryCourse,
}

impl UiApp for TestApp {
    fn course_id(&self) -> CourseId {
        CourseId::new(7)
    }

    fn remote(&self) -> Remote {
        Remote::in_memory(self.course.clone())
    }

    fn drill_config(&self) -> DrillConfig {
        DrillConfig::default()
    }
}

#[derive(Props, Clone)]
struct DrillHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for DrillHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn DrillHarness(props: DrillHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { DrillView { course: 7 } }
}

#[component]
fn PanelHarness(vm: DrillVm) -> Element {
    rsx! {
        DrillPanel {
            vm,
            on_action: move |_| {},
            on_restart: move |_| {},
        }
    }
}

fn render_panel(snapshot: &DrillSnapshot) -> String {
    let mut dom = VirtualDom::new_with_props(
        PanelHarness,
        PanelHarnessProps {
            vm: map_drill_snapshot(snapshot),
        },
    );
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

async fn drive(dom: &mut VirtualDom) {
    for _ in 0..5 {
        let _ = tokio::time::timeout(Duration::from_millis(50), dom.wait_for_work()).await;
        dom.render_immediate(&mut NoOpMutations);
        dom.process_events();
    }
}

#[test]
fn panel_renders_options_with_key_hints() {
    let snapshot = DrillSnapshot {
        phase: DrillPhase::AwaitingGuess,
        exercise: Some(ExerciseId::new(1)),
        options: Some(["לָ".to_string(), "מָ".to_string()]),
        has_cue: true,
        ..DrillSnapshot::default()
    };
    let html = render_panel(&snapshot);
    assert!(html.contains("Which one did you hear?"), "{html}");
    assert!(html.contains("לָ"), "{html}");
    assert!(html.contains("מָ"), "{html}");
    assert!(html.contains("← / A"), "{html}");
    assert!(!html.contains("Restart"), "{html}");
}

#[test]
fn panel_renders_banner_and_restart_when_halted() {
    let snapshot = DrillSnapshot {
        phase: DrillPhase::Halted,
        banner: Some("Exercise service is down".into()),
        ..DrillSnapshot::default()
    };
    let html = render_panel(&snapshot);
    assert!(html.contains("Exercise service is down"), "{html}");
    assert!(html.contains("Restart"), "{html}");
}

#[test]
fn panel_shows_time_up_hint() {
    let snapshot = DrillSnapshot {
        phase: DrillPhase::TimedOut,
        options: Some(["a".to_string(), "b".to_string()]),
        time_up: true,
        ..DrillSnapshot::default()
    };
    let html = render_panel(&snapshot);
    assert!(html.contains("Press Enter to continue"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn drill_view_presents_first_exercise() {
    let exercise = Exercise::new(
        ExerciseId::new(1),
        "בָּ",
        "בּוֹ",
        None,
    );
    let course = InMemoryCourse::new().with_exercise(CourseId::new(7), exercise, "בָּ");
    let app = Arc::new(TestApp {
        course: course.clone(),
    });

    let mut dom = VirtualDom::new_with_props(DrillHarness, DrillHarnessProps { app });
    dom.rebuild_in_place();
    drive(&mut dom).await;

    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("בָּ"), "{html}");
    assert!(html.contains("בּוֹ"), "{html}");
    assert_eq!(course.fetch_log().len(), 1);
}
