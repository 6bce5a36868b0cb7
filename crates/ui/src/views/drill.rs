use std::sync::Arc;

use alingo_core::model::{CourseId, Side};
use alingo_core::{DrillAction, action_for_key};
use dioxus::document::eval;
use dioxus::prelude::*;
use services::{DrillHandle, DrillSnapshot};

use crate::audio::EvalCueSink;
use crate::context::AppContext;
use crate::vm::{ChoiceVm, DrillVm, map_drill_snapshot};

const DRILL_ROOT_ID: &str = "drill-root";

/// Runs one drill session for `course` and renders its snapshots.
#[component]
pub fn DrillView(course: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let mut snapshot = use_signal(DrillSnapshot::default);

    let handle = use_hook(move || {
        let (handle, commands) = DrillHandle::channel();
        let machine = ctx.drill_machine(Arc::new(EvalCueSink));
        let mut updates = machine.subscribe();

        spawn(async move {
            machine.run(commands).await;
        });
        spawn(async move {
            while updates.changed().await.is_ok() {
                let next = updates.borrow_and_update().clone();
                snapshot.set(next);
            }
        });

        if !handle.start(CourseId::new(course)) {
            tracing::warn!(course, "drill session closed before start");
        }
        handle
    });

    let handle_for_drop = handle.clone();
    use_drop(move || {
        handle_for_drop.shutdown();
    });

    use_effect(move || {
        let _ = eval(&format!(
            "document.getElementById('{DRILL_ROOT_ID}')?.focus();"
        ));
    });

    let vm = map_drill_snapshot(&snapshot.read());
    let action_handle = handle.clone();
    let restart_handle = handle;

    rsx! {
        DrillPanel {
            vm,
            on_action: move |action: DrillAction| {
                action_handle.input(action);
            },
            on_restart: move |_| {
                restart_handle.restart();
            },
        }
    }
}

/// Stateless rendering of a drill view model.
#[component]
pub fn DrillPanel(
    vm: DrillVm,
    on_action: EventHandler<DrillAction>,
    on_restart: EventHandler<()>,
) -> Element {
    let time_up = vm.time_up;
    let can_replay = vm.can_replay;

    rsx! {
        div {
            id: DRILL_ROOT_ID,
            class: "page drill-page",
            tabindex: "0",
            onkeydown: move |evt: KeyboardEvent| {
                if let Some(action) = action_for_key(&evt.data.key().to_string()) {
                    evt.prevent_default();
                    on_action.call(action);
                }
            },
            header { class: "view-header",
                h2 { class: "view-title", "{vm.status}" }
                p { class: "view-subtitle drill-tally", "{vm.tally}" }
            }
            if let Some(banner) = vm.banner.as_ref() {
                div { class: "drill-banner", role: "alert", "{banner}" }
            }
            div { class: "drill-choices",
                ChoiceButton { choice: vm.left.clone(), side: Side::Left, on_action }
                ChoiceButton { choice: vm.right.clone(), side: Side::Right, on_action }
            }
            if time_up {
                p { class: "drill-time-up", "Time's up! Press Enter to continue." }
            }
            div { class: "drill-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: !can_replay,
                    onclick: move |_| on_action.call(DrillAction::ReplayCue),
                    "Play again"
                }
                if vm.show_restart {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_restart.call(()),
                        "Restart"
                    }
                }
            }
        }
    }
}

#[component]
fn ChoiceButton(choice: ChoiceVm, side: Side, on_action: EventHandler<DrillAction>) -> Element {
    rsx! {
        button {
            class: "{choice.class}",
            r#type: "button",
            onclick: move |_| on_action.call(DrillAction::Choose(side)),
            span { class: "choice-text", dir: "auto", "{choice.text}" }
            span { class: "choice-key", "{choice.key_hint}" }
        }
    }
}
