use common::error::ImportError;
use common::model::roster::ImportResult;
use common::roster::SelectionToken;

#[derive(Clone)]
pub enum Msg {
    FileChosen(web_sys::File),
    FileRead {
        token: SelectionToken,
        bytes: Result<Vec<u8>, String>,
    },
    Import,
    ImportFinished {
        token: SelectionToken,
        outcome: Result<ImportResult, ImportError>,
    },
    DownloadIssueReport,
    DownloadCorrections,
}
