//! View rendering for the roster import component.
//!
//! Layout, top to bottom: toolbar (file picker, import, downloads), status
//! line, header warning, counters, the row table of the current preview, the
//! import result with invite links, and the unified issue list.

use common::model::invite::invite_validity_notice;
use common::model::roster::{ImportResult, Issue, PreviewResult};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{format_count, phase_status};
use super::messages::Msg;
use super::state::RosterImportComponent;

pub fn view(component: &RosterImportComponent, ctx: &Context<RosterImportComponent>) -> Html {
    let link = ctx.link();
    let session = &component.session;

    html! {
        <div class="card roster-import">
            <h2>{ format!("Import roster into {}", ctx.props().course_id) }</h2>
            { build_toolbar(component, link) }
            { build_status(component) }
            {
                match session.preview() {
                    Some(preview) => html! {
                        <>
                            { build_header_warning(preview) }
                            { build_counters(preview, session.issues()) }
                            { build_row_table(preview) }
                        </>
                    },
                    None => html! {
                        <p>{"Choose a CSV file with the columns email, name, student_number and programme."}</p>
                    },
                }
            }
            { session.import_result().map(build_import_result).unwrap_or_default() }
            { build_issue_table(session.issues()) }
        </div>
    }
}

fn build_toolbar(component: &RosterImportComponent, link: &Scope<RosterImportComponent>) -> Html {
    let session = &component.session;
    let has_issues = !session.issues().is_empty();
    let onchange = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().and_then(|files| files.get(0));
        // Cleared so the same file can be picked again after editing it.
        input.set_value("");
        file.map(Msg::FileChosen)
    });

    html! {
        <div class="icon-toolbar">
            <input
                type="file"
                accept=".csv,text/csv"
                onchange={onchange}
            />
            {
                icon_button(
                    "cloud_upload",
                    "Import",
                    link.callback(|_| Msg::Import),
                    !session.can_import() || session.is_busy(),
                )
            }
            {
                icon_button(
                    "report",
                    "Issue report",
                    link.callback(|_| Msg::DownloadIssueReport),
                    !has_issues,
                )
            }
            {
                icon_button(
                    "edit_note",
                    "Correction file",
                    link.callback(|_| Msg::DownloadCorrections),
                    !has_issues,
                )
            }
        </div>
    }
}

fn build_status(component: &RosterImportComponent) -> Html {
    let is_error = component.session.failure().is_some();
    match phase_status(component.session.phase()) {
        Some(status) => html! {
            <div class={classes!("status", is_error.then_some("error"))}>{ status }</div>
        },
        None => html! {},
    }
}

fn build_header_warning(preview: &PreviewResult) -> Html {
    if preview.can_import() {
        return html! {};
    }
    let missing: Vec<&str> = preview
        .missing_headers
        .iter()
        .map(|column| column.key())
        .collect();
    html! {
        <div class="warning">
            { format!("Import is disabled. Missing required headers: {}", missing.join(", ")) }
        </div>
    }
}

fn build_counters(preview: &PreviewResult, issues: &[Issue]) -> Html {
    html! {
        <p>
            { format!(
                "{}: {} row(s), {} without issues, {} issue(s)",
                preview.file_name,
                format_count(preview.rows.len()),
                format_count(preview.valid_row_count()),
                format_count(issues.len()),
            ) }
        </p>
    }
}

fn build_row_table(preview: &PreviewResult) -> Html {
    if preview.rows.is_empty() {
        return html! { <p>{"The file has no data rows."}</p> };
    }
    html! {
        <table>
            <thead>
                <tr>
                    <th>{"Row"}</th>
                    <th>{"Email"}</th>
                    <th>{"Name"}</th>
                    <th>{"Student number"}</th>
                    <th>{"Programme"}</th>
                    <th>{"Issues"}</th>
                </tr>
            </thead>
            <tbody>
                {
                    for preview.rows.iter().map(|row| {
                        let reasons: Vec<&str> = preview
                            .issues_for_row(row.row_number)
                            .map(|issue| issue.reason_label.as_str())
                            .collect();
                        html! {
                            <tr class={classes!((!row.is_valid).then_some("invalid"))}>
                                <td>{ row.row_number }</td>
                                <td>{ row.email.clone() }</td>
                                <td>{ row.full_name.clone() }</td>
                                <td>{ row.student_number.clone() }</td>
                                <td>{ row.programme.clone() }</td>
                                <td class="reason">{ reasons.join("; ") }</td>
                            </tr>
                        }
                    })
                }
            </tbody>
        </table>
    }
}

fn build_import_result(result: &ImportResult) -> Html {
    html! {
        <div class="import-result">
            <h3>{ result.summary() }</h3>
            {
                if result.invite_links.is_empty() {
                    html! {}
                } else {
                    html! {
                        <>
                            <p>{ invite_validity_notice() }</p>
                            <ul>
                                { for result.invite_links.iter().map(|link| html! {
                                    <li><a href={link.clone()}>{ link.clone() }</a></li>
                                }) }
                            </ul>
                        </>
                    }
                }
            }
        </div>
    }
}

fn build_issue_table(issues: &[Issue]) -> Html {
    if issues.is_empty() {
        return html! {};
    }
    html! {
        <>
            <h3>{"Issues"}</h3>
            <table>
                <thead>
                    <tr>
                        <th>{"Row"}</th>
                        <th>{"Email"}</th>
                        <th>{"Reason"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for issues.iter().map(|issue| html! {
                        <tr>
                            <td>{ issue.row_number.map(|n| n.to_string()).unwrap_or_else(|| "header".to_string()) }</td>
                            <td>{ issue.email.clone() }</td>
                            <td class="reason">{ issue.reason_label.clone() }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </>
    }
}

fn icon_button(icon_name: &str, label: &str, on_click: Callback<MouseEvent>, disabled: bool) -> Html {
    html! {
        <button class="icon-btn" onclick={on_click} disabled={disabled}>
            <i class="material-icons">{icon_name}</i>
            <span class="icon-label">{label}</span>
        </button>
    }
}
