use crate::components::roster::import::RosterImportComponent;
use crate::components::roster::invite::SingleInviteComponent;
use yew::{html, Component, Context, Html};

const DEFAULT_COURSE: &str = "demo";

pub struct App {
    course_id: String,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let search = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default();
        Self {
            course_id: course_from_query(&search),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="roster-root">
                <RosterImportComponent course_id={self.course_id.clone()} />
                <SingleInviteComponent course_id={self.course_id.clone()} />
            </div>
        }
    }
}

/// Reads `course=<id>` from a location query string. Ids are restricted to
/// ASCII letters, digits, `-` and `_` so they can be put in a URL path as-is.
fn course_from_query(search: &str) -> String {
    search
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix("course="))
        .filter(|id| {
            !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .unwrap_or(DEFAULT_COURSE)
        .to_string()
}
