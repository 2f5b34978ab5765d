//! Terminal renderer for view signals

use anyhow::Result;
use colored::Colorize;

use staffhub_core::adapters::views::ViewEvent;
use staffhub_core::domain::NavAffordances;
use staffhub_core::services::Denial;
use staffhub_core::{Route, StaffhubContext, View};

use crate::output::{create_table, info, short_id, yes_no};

fn page_title(page: Route) -> &'static str {
    match page {
        Route::Home => "Home",
        Route::Register => "Register",
        Route::Verify => "Verify your email",
        Route::Login => "Sign in",
        Route::Profile => "Profile",
        Route::Employees => "Employees",
        Route::Accounts => "Accounts",
        Route::Departments => "Departments",
        Route::MyRequests => "My requests",
    }
}

pub fn denial_message(requested: Route, denial: Denial) -> String {
    match denial {
        Denial::LoginRequired => format!("Sign in to open {}", requested.hash()),
        Denial::AdminOnly => format!("{} is for administrators", requested.hash()),
    }
}

/// Render drained events in order, each view at most once
pub fn render(ctx: &mut StaffhubContext, events: Vec<ViewEvent>) -> Result<()> {
    let mut seen: Vec<ViewEvent> = Vec::new();
    for event in events {
        if seen.contains(&event) {
            continue;
        }
        seen.push(event.clone());

        match event {
            ViewEvent::PageRendered { page } => {
                println!();
                println!("{} {}", page_title(page).bold(), page.hash().dimmed());
            }
            ViewEvent::ViewRefreshed { view } => render_view(ctx, view)?,
            ViewEvent::NavigationUpdated { nav } => render_navigation(&nav),
        }
    }
    Ok(())
}

fn render_navigation(nav: &NavAffordances) {
    let mut links = Vec::new();
    if nav.guest_links {
        links.extend(["register", "login"]);
    }
    if nav.user_menu {
        links.extend(["profile", "requests", "logout"]);
    }
    if nav.admin_links {
        links.extend(["accounts", "departments", "employees"]);
    }

    let who = nav
        .display_name
        .as_deref()
        .map(|name| format!("Hi, {}", name))
        .unwrap_or_else(|| "Not signed in".to_string());
    println!("{}  {}", who.bold(), links.join(" · ").dimmed());
}

fn render_view(ctx: &mut StaffhubContext, view: View) -> Result<()> {
    match view {
        View::Profile => {
            let auth = ctx.auth();
            let Ok(account) = auth.profile() else {
                return Ok(());
            };
            let mut table = create_table();
            table.add_row(vec!["Name".to_string(), account.full_name()]);
            table.add_row(vec!["Email".to_string(), account.email.clone()]);
            table.add_row(vec!["Role".to_string(), account.role.to_string()]);
            table.add_row(vec!["Verified".to_string(), yes_no(account.verified)]);
            println!("{}", table);
        }
        View::VerifyNotice => {
            if let Some(email) = ctx.auth().pending_verification()? {
                info(&format!("A verification link was sent to {}.", email));
                println!("{}", "Run `staffhub verify` to follow it.".dimmed());
            }
        }
        View::Accounts => {
            let service = ctx.accounts();
            // Signals can outlive the permission that caused them
            let Ok(accounts) = service.list() else {
                return Ok(());
            };
            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Email", "Role", "Verified"]);
            for a in accounts {
                table.add_row(vec![
                    short_id(a.id),
                    a.full_name(),
                    a.email.clone(),
                    a.role.to_string(),
                    yes_no(a.verified),
                ]);
            }
            println!("{}", table);
        }
        View::Departments => {
            let service = ctx.departments();
            let Ok(departments) = service.list() else {
                return Ok(());
            };
            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Description"]);
            for d in departments {
                table.add_row(vec![short_id(d.id), d.name.clone(), d.description.clone()]);
            }
            println!("{}", table);
        }
        View::DepartmentOptions => {
            let options = ctx.directory.department_options();
            let shown = if options.is_empty() {
                "(none)".to_string()
            } else {
                options.join(", ")
            };
            println!("{} {}", "Departments:".dimmed(), shown);
        }
        View::Employees => {
            let service = ctx.employees();
            let Ok(employees) = service.list() else {
                return Ok(());
            };
            if employees.is_empty() {
                println!("{}", "No employees yet.".dimmed());
                return Ok(());
            }
            let mut table = create_table();
            table.set_header(vec!["ID", "Employee ID", "Email", "Position", "Dept", "Hired"]);
            for e in employees {
                table.add_row(vec![
                    short_id(e.id),
                    e.employee_id.clone(),
                    e.email.clone(),
                    e.position.clone(),
                    e.dept.clone(),
                    e.hire_date.to_string(),
                ]);
            }
            println!("{}", table);
        }
        View::MyRequests => {
            let service = ctx.requests();
            let Ok(requests) = service.list_mine() else {
                return Ok(());
            };
            if requests.is_empty() {
                println!("{}", "No requests yet.".dimmed());
                return Ok(());
            }
            let mut table = create_table();
            table.set_header(vec!["ID", "Type", "Items", "Status", "Created"]);
            for r in requests {
                let items = r
                    .items
                    .iter()
                    .map(|i| format!("{} ×{}", i.name, i.qty))
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![
                    short_id(r.id),
                    r.kind.clone(),
                    items,
                    r.status.to_string(),
                    r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
