use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::DrillView;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let course = ctx.course_id().value();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Alingo" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                DrillView { course }
            }
        }
    }
}
