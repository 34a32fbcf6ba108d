//! Single-student invite form.
//!
//! Posts a `SingleInviteRequest` as JSON to
//! `/api/courses/{course_id}/roster/invite`. Field errors come back as
//! `422 { "errors": [...] }` and are shown under the matching input; a
//! `409` means the student number is already used in the course.

use common::model::invite::{invite_validity_notice, SingleInviteResult};
use common::model::roster::RosterColumn;
use common::requests::SingleInviteRequest;
use common::roster::InviteFormError;
use gloo_console::error;
use gloo_net::http::Request;
use serde::Deserialize;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SingleInviteProps {
    pub course_id: String,
}

#[derive(Clone)]
pub enum InviteOutcome {
    Sent(SingleInviteResult),
    Invalid(Vec<InviteFormError>),
    Failed(String),
}

pub enum Msg {
    SetField(RosterColumn, String),
    Submit,
    Finished(InviteOutcome),
}

#[derive(Deserialize)]
struct InviteRejection {
    errors: Vec<InviteFormError>,
}

#[derive(Deserialize)]
struct InviteConflict {
    reason_label: String,
}

pub struct SingleInviteComponent {
    request: SingleInviteRequest,
    sending: bool,
    outcome: Option<InviteOutcome>,
}

impl Component for SingleInviteComponent {
    type Message = Msg;
    type Properties = SingleInviteProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            request: SingleInviteRequest::default(),
            sending: false,
            outcome: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetField(column, value) => {
                *field_mut(&mut self.request, column) = value;
                false
            }
            Msg::Submit => {
                if self.sending {
                    return false;
                }
                self.sending = true;
                let url = invite_url(&ctx.props().course_id);
                let request = self.request.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Finished(send_invite(&url, &request).await));
                });
                true
            }
            Msg::Finished(outcome) => {
                self.sending = false;
                if let InviteOutcome::Failed(message) = &outcome {
                    error!(format!("invite failed: {}", message));
                }
                if let InviteOutcome::Sent(_) = &outcome {
                    self.request = SingleInviteRequest::default();
                }
                self.outcome = Some(outcome);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let errors: &[InviteFormError] = match &self.outcome {
            Some(InviteOutcome::Invalid(errors)) => errors,
            _ => &[],
        };
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="card single-invite">
                <h2>{"Invite one student"}</h2>
                <form onsubmit={onsubmit}>
                    <div class="form-grid">
                        { for RosterColumn::REQUIRED.iter().map(|column| {
                            self.field(link, *column, errors)
                        }) }
                    </div>
                    <button class="icon-btn" type="submit" disabled={self.sending}>
                        <i class="material-icons">{"person_add"}</i>
                        <span class="icon-label">{"Invite"}</span>
                    </button>
                </form>
                { self.outcome_view() }
            </div>
        }
    }
}

impl SingleInviteComponent {
    fn field(
        &self,
        link: &Scope<Self>,
        column: RosterColumn,
        errors: &[InviteFormError],
    ) -> Html {
        let value = match column {
            RosterColumn::Email => &self.request.email,
            RosterColumn::Name => &self.request.full_name,
            RosterColumn::StudentNumber => &self.request.student_number,
            RosterColumn::Programme => &self.request.programme,
        };
        let oninput = link.callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetField(column, input.value())
        });
        html! {
            <label>
                { column.key() }
                <input type="text" value={value.clone()} oninput={oninput} />
                { for errors.iter().filter(|error| error.field == column).map(|error| html! {
                    <div class="field-error">{ error.message.clone() }</div>
                }) }
            </label>
        }
    }

    fn outcome_view(&self) -> Html {
        match &self.outcome {
            Some(InviteOutcome::Sent(result)) => match &result.invite_link {
                Some(invite_link) => html! {
                    <p>
                        {"Invite created: "}
                        <a href={invite_link.clone()}>{ invite_link.clone() }</a>
                        { format!(" ({})", invite_validity_notice()) }
                    </p>
                },
                None => html! { <p>{"The student already had an account and was enrolled."}</p> },
            },
            Some(InviteOutcome::Failed(message)) => html! {
                <p class="status error">{ message.clone() }</p>
            },
            _ => html! {},
        }
    }
}

fn field_mut(request: &mut SingleInviteRequest, column: RosterColumn) -> &mut String {
    match column {
        RosterColumn::Email => &mut request.email,
        RosterColumn::Name => &mut request.full_name,
        RosterColumn::StudentNumber => &mut request.student_number,
        RosterColumn::Programme => &mut request.programme,
    }
}

fn invite_url(course_id: &str) -> String {
    format!("/api/courses/{}/roster/invite", course_id)
}

async fn send_invite(url: &str, request: &SingleInviteRequest) -> InviteOutcome {
    let response = match Request::post(url).json(request) {
        Ok(builder) => builder.send().await,
        Err(e) => return InviteOutcome::Failed(e.to_string()),
    };
    let response = match response {
        Ok(response) => response,
        Err(e) => return InviteOutcome::Failed(format!("network error: {}", e)),
    };

    match response.status() {
        200 => match response.json::<SingleInviteResult>().await {
            Ok(result) => InviteOutcome::Sent(result),
            Err(e) => InviteOutcome::Failed(format!("unexpected response: {}", e)),
        },
        422 => match response.json::<InviteRejection>().await {
            Ok(rejection) => InviteOutcome::Invalid(rejection.errors),
            Err(e) => InviteOutcome::Failed(format!("unexpected response: {}", e)),
        },
        409 => match response.json::<InviteConflict>().await {
            Ok(conflict) => InviteOutcome::Failed(conflict.reason_label),
            Err(e) => InviteOutcome::Failed(format!("unexpected response: {}", e)),
        },
        status => InviteOutcome::Failed(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_map_to_request_members() {
        let mut request = SingleInviteRequest::default();
        *field_mut(&mut request, RosterColumn::Name) = "Ana".into();
        *field_mut(&mut request, RosterColumn::Programme) = "CS".into();
        assert_eq!(request.full_name, "Ana");
        assert_eq!(request.programme, "CS");
        assert!(request.email.is_empty());
    }

    #[test]
    fn invite_url_contains_course() {
        assert_eq!(invite_url("demo"), "/api/courses/demo/roster/invite");
    }
}
