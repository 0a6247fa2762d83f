use trackreg_core::escape::html;
use trackreg_core::{Account, AccountId};

use crate::submission::{FieldNotice, Submission};

pub const NO_ACCOUNTS_MESSAGE: &str = "No accounts, please add one using the input boxes below";

pub const NO_ACCOUNT_COMMENT: &str = "<!-- No GA Account Specified -->";

/// What the account listing produced for this render.
#[derive(Debug, Clone, Copy)]
pub enum AccountsState<'a> {
    Listed(&'a [Account]),
    NoAccounts,
    /// Listing failed for a reason other than an empty table.
    Failed,
}

pub struct SettingsView<'a> {
    pub title: &'a str,
    pub accounts: AccountsState<'a>,
    /// Radio option to pre-check.
    pub selected: Option<AccountId>,
    pub pending: &'a Submission,
    pub notices: &'a [FieldNotice],
}

pub fn unknown_error_message(title: &str) -> String {
    format!("An unknown error occurred with the {title} script")
}

pub fn settings_section(view: &SettingsView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("<h2>{}</h2>\n", html(view.title)));

    for notice in view.notices {
        out.push_str(&format!(
            "<div id=\"setting-error-{}\" class=\"error settings-error\"><p><strong>{}</strong></p></div>\n",
            notice.setting,
            html(&notice.message),
        ));
    }

    match view.accounts {
        AccountsState::NoAccounts => {
            out.push_str(&format!("<div style=\"padding: 0 0 10px 0\">{NO_ACCOUNTS_MESSAGE}</div>\n"));
        }
        AccountsState::Failed => {
            out.push_str(&format!(
                "<div class=\"error\"><p>{}</p></div>\n",
                html(&unknown_error_message(view.title)),
            ));
        }
        AccountsState::Listed(_) => {}
    }

    out.push_str("<table style='width:80%' cellspacing='0'>\n");
    out.push_str("<tr style='height:30px; background-color:#efefef; font-weight:bold;'><td></td><td>ID</td><td>Portfolio</td><td>Email</td><td>Analytics ID</td><td width='25'></td></tr>\n");

    if let AccountsState::Listed(accounts) = view.accounts {
        for account in accounts {
            let checked = if view.selected == Some(account.id) {
                " checked=\"checked\""
            } else {
                ""
            };
            out.push_str(&format!(
                "<tr style=\"height:30px;\"><td><input type=\"radio\" name=\"current_account_id\" value=\"{id}\"{checked} /></td><td>{id}</td><td>{portfolio}</td><td>{email}</td><td>{analytics_id}</td><td></td></tr>\n",
                id = account.id,
                portfolio = html(&account.portfolio),
                email = html(&account.email),
                analytics_id = html(&account.analytics_id),
            ));
        }
    }

    out.push_str(&format!(
        "<tr><td></td><td></td>{}{}{}<td><input style=\"padding: 4px;border-radius: 12px;width: 25px;height: 25px;background-color: #EFEFEF;cursor: pointer;\" type=\"submit\" value=\"+\" /></td></tr>\n",
        input_cell("add_portfolio", &view.pending.portfolio, 100),
        input_cell("add_email", &view.pending.email, 101),
        input_cell("add_gaid", &view.pending.analytics_id, 102),
    ));
    out.push_str("</table>\n");
    out
}

fn input_cell(name: &str, value: &str, tabindex: u32) -> String {
    format!(
        "<td><input style=\"width:90%\" name=\"{name}\" id=\"{name}\" value=\"{}\" tabindex=\"{tabindex}\" /></td>",
        html(value)
    )
}
