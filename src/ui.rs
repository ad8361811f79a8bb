use crate::controller::{Store, Tab};
use crate::forms::{AttendanceForm, EmployeeForm, Flash};
use crate::models::{AttendanceStatus, Employee};
use crate::state::UiState;
use crate::stats::AttendanceSummary;
use crate::views::{self, EmployeeAttendancePanel, ViewState};
use chrono::{DateTime, Local, NaiveDate};
use std::borrow::Cow;
use std::fmt::Write;

pub fn render_index(store: &Store, ui: &UiState, today: NaiveDate, now: DateTime<Local>) -> String {
    let content = match (&store.selected_employee, store.active_tab) {
        (Some(employee), _) => match &ui.detail {
            Some(panel) if panel.employee_id() == employee.employee_id => render_panel(panel),
            _ => render_panel(&EmployeeAttendancePanel::mount(employee.clone(), 0)),
        },
        (None, Tab::Employees) => {
            let mut html = render_employee_form(&ui.employee_form, store.loading, now);
            html.push_str(&render_notice(store.employee_notice.as_deref()));
            html.push_str(&render_employee_list(store));
            html
        }
        (None, Tab::Attendance) => {
            let mut html = render_attendance_form(
                &ui.attendance_form,
                &store.employees,
                store.loading,
                today,
                now,
            );
            html.push_str(&render_attendance_records(store, ui.records_date(today), today));
            html
        }
    };

    INDEX_HTML
        .replace("{{NAV}}", &render_nav(store.active_tab))
        .replace("{{CONTENT}}", &content)
}

fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn render_nav(active: Tab) -> String {
    let tab = |tab: Tab, label: &str| {
        let class = if tab == active { "nav-tab active" } else { "nav-tab" };
        format!(
            r#"<form method="post" action="/tabs/{}"><button class="{class}" type="submit">{label}</button></form>"#,
            tab.as_str()
        )
    };
    format!(
        r#"<nav class="nav-tabs">{}{}</nav>"#,
        tab(Tab::Employees, "👥 Employees"),
        tab(Tab::Attendance, "📋 Attendance")
    )
}

fn render_loading() -> String {
    r#"<div class="loading"><div class="spinner"></div>Loading...</div>"#.to_string()
}

fn render_empty(icon: &str, message: &str) -> String {
    format!(
        r#"<div class="empty-state"><div class="empty-state-icon">{icon}</div><p>{}</p></div>"#,
        text(message)
    )
}

fn render_error(message: &str, dismiss_action: &str) -> String {
    format!(
        r#"<div class="error"><span>⚠️ {}</span><form method="post" action="{dismiss_action}"><button type="submit" title="Dismiss">✕</button></form></div>"#,
        text(message)
    )
}

fn render_flash(flash: Option<&Flash>, now: DateTime<Local>) -> String {
    match flash.filter(|flash| flash.is_visible(now)) {
        Some(flash) => format!(
            r#"<div class="success-message" data-expires-in="{}">✓ {}</div>"#,
            flash.remaining_ms(now),
            text(&flash.message)
        ),
        None => String::new(),
    }
}

fn render_submit_error(message: Option<&str>, dismiss_action: &str) -> String {
    match message {
        Some(message) => format!(
            r#"<div class="error submit-error"><span>{}</span><form method="post" action="{dismiss_action}"><button type="submit" title="Dismiss">✕</button></form></div>"#,
            text(message)
        ),
        None => String::new(),
    }
}

fn render_field_error(message: Option<&String>) -> String {
    message
        .filter(|message| !message.is_empty())
        .map(|message| format!(r#"<div class="form-error">{}</div>"#, text(message)))
        .unwrap_or_default()
}

fn render_text_input(
    form: &str,
    name: &str,
    label: &str,
    input_type: &str,
    value: &str,
    placeholder: &str,
    error: Option<&String>,
) -> String {
    format!(
        r#"<div class="form-group"><label for="{form}-{name}">{label} *</label><input id="{form}-{name}" form="{form}" type="{input_type}" name="{name}" value="{}" placeholder="{placeholder}" />{}</div>"#,
        attr(value),
        render_field_error(error)
    )
}

fn render_employee_form(form: &EmployeeForm, loading: bool, now: DateTime<Local>) -> String {
    let fields = &form.fields;
    let inputs = [
        ("employee_id", "Employee ID", "text", &fields.employee_id, "e.g., EMP001"),
        ("full_name", "Full Name", "text", &fields.full_name, "e.g., John Doe"),
        ("email", "Email Address", "email", &fields.email, "e.g., john@company.com"),
        ("department", "Department", "text", &fields.department, "e.g., Engineering"),
    ];

    let mut rows = String::new();
    for pair in inputs.chunks(2) {
        rows.push_str(r#"<div class="form-row">"#);
        for (name, label, input_type, value, placeholder) in pair {
            rows.push_str(&render_text_input(
                "employee-form",
                name,
                label,
                input_type,
                value,
                placeholder,
                form.errors.get(name),
            ));
        }
        rows.push_str("</div>");
    }

    let disabled = if loading { " disabled" } else { "" };
    let label = if loading { "Adding..." } else { "Add Employee" };

    format!(
        r#"<section class="form-container"><h2>➕ Add New Employee</h2>{}{}<form id="employee-form" method="post" action="/employees" novalidate></form>{rows}<div class="button-group"><button form="employee-form" type="submit" class="btn btn-primary"{disabled}>{label}</button></div></section>"#,
        render_flash(form.success.as_ref(), now),
        render_submit_error(form.submit_error.as_deref(), "/forms/employee/error/dismiss"),
    )
}

fn render_notice(notice: Option<&str>) -> String {
    match notice {
        Some(message) => render_error(message, "/notice/dismiss"),
        None => String::new(),
    }
}

fn render_employee_list(store: &Store) -> String {
    let rows = match views::employee_list(store) {
        ViewState::Loading => return render_loading(),
        ViewState::Error(message) => return render_error(&message, "/errors/employees/dismiss"),
        ViewState::Empty => {
            return render_empty("👥", "No employees found. Add one to get started!");
        }
        ViewState::Populated(rows) => rows,
    };

    let mut body = String::new();
    for employee in rows.employees {
        let id = attr(&employee.employee_id);
        let confirm = format!("Are you sure you want to delete {}?", employee.full_name);
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td class="employee-name">{}</td><td>{}</td><td><span class="badge badge-dept">{}</span></td><td><div class="action-buttons"><form method="post" action="/employees/view"><input type="hidden" name="employee_id" value="{id}" /><button class="btn-sm btn-view" type="submit" title="View attendance records">📋 Attendance</button></form><form method="post" action="/employees/delete" data-confirm="{}" onsubmit="return confirm(this.dataset.confirm);"><input type="hidden" name="employee_id" value="{id}" /><button class="btn-sm btn-delete" type="submit" title="Delete employee">🗑️ Delete</button></form></div></td></tr>"#,
            text(&employee.employee_id),
            text(&employee.full_name),
            text(&employee.email),
            text(&employee.department),
            attr(&confirm),
        );
    }

    format!(
        r#"<section class="table-container"><div class="table-header"><h2>👥 Employees ({})</h2><p>Manage your workforce</p></div><div class="table-wrapper"><table><thead><tr><th>Employee ID</th><th>Full Name</th><th>Email</th><th>Department</th><th>Actions</th></tr></thead><tbody>{body}</tbody></table></div></section>"#,
        rows.count
    )
}

fn render_attendance_form(
    form: &AttendanceForm,
    employees: &[Employee],
    loading: bool,
    today: NaiveDate,
    now: DateTime<Local>,
) -> String {
    let fields = form.fields(today);

    let mut options = String::from(r#"<option value="">-- Choose Employee --</option>"#);
    for employee in employees {
        let selected = if employee.employee_id == fields.employee_id {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            r#"<option value="{}"{selected}>{} ({})</option>"#,
            attr(&employee.employee_id),
            text(&employee.full_name),
            text(&employee.employee_id)
        );
    }

    let mut statuses = String::new();
    for (status, label) in [
        (AttendanceStatus::Present, "Present ✓"),
        (AttendanceStatus::Absent, "Absent ✕"),
    ] {
        let selected = if fields.status == status.as_str() { " selected" } else { "" };
        let _ = write!(
            statuses,
            r#"<option value="{}"{selected}>{label}</option>"#,
            status.as_str()
        );
    }

    let disabled = if loading || employees.is_empty() { " disabled" } else { "" };
    let label = if loading { "Marking..." } else { "Mark Attendance" };
    let hint = if employees.is_empty() {
        r#"<p class="hint">ℹ️ Add employees first to mark attendance</p>"#
    } else {
        ""
    };

    format!(
        r#"<section class="form-container"><h2>📋 Mark Attendance</h2>{}{}<form id="attendance-form" method="post" action="/attendance" novalidate></form><div class="form-row"><div class="form-group"><label for="attendance-employee">Select Employee *</label><select id="attendance-employee" form="attendance-form" name="employee_id">{options}</select>{}</div><div class="form-group"><label for="attendance-date">Date *</label><input id="attendance-date" form="attendance-form" type="date" name="date" value="{}" max="{today}" />{}</div><div class="form-group"><label for="attendance-status">Status *</label><select id="attendance-status" form="attendance-form" name="status">{statuses}</select>{}</div></div><div class="button-group"><button form="attendance-form" type="submit" class="btn btn-primary"{disabled}>{label}</button></div>{hint}</section>"#,
        render_flash(form.success.as_ref(), now),
        render_submit_error(form.submit_error.as_deref(), "/forms/attendance/error/dismiss"),
        render_field_error(form.errors.get("employee_id")),
        attr(&fields.date),
        render_field_error(form.errors.get("date")),
        render_field_error(form.errors.get("status")),
    )
}

fn render_summary(summary: &AttendanceSummary, labels: [&str; 3]) -> String {
    format!(
        r#"<div class="attendance-summary"><div class="summary-item"><div class="summary-item-value total">{}</div><div class="summary-item-label">{}</div></div><div class="summary-item"><div class="summary-item-value present">{}</div><div class="summary-item-label">{}</div></div><div class="summary-item"><div class="summary-item-value absent">{}</div><div class="summary-item-label">{}</div></div></div>"#,
        summary.total, labels[0], summary.present, labels[1], summary.absent, labels[2]
    )
}

fn render_status_badge(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => r#"<span class="status-badge status-present">✓ Present</span>"#,
        AttendanceStatus::Absent => r#"<span class="status-badge status-absent">✕ Absent</span>"#,
    }
}

fn render_attendance_records(store: &Store, date: NaiveDate, today: NaiveDate) -> String {
    let daily = match views::attendance_records(store, date) {
        ViewState::Loading => return render_loading(),
        ViewState::Error(message) => return render_error(&message, "/errors/attendance/dismiss"),
        ViewState::Empty => return render_empty("📋", "No attendance records found yet"),
        ViewState::Populated(daily) => daily,
    };

    let listing = if daily.records.is_empty() {
        render_empty(
            "📅",
            &format!("No records for {}", daily.date.format("%-m/%-d/%Y")),
        )
    } else {
        let mut body = String::new();
        for record in &daily.records {
            let _ = write!(
                body,
                r#"<tr><td>{}</td><td class="employee-name">{}</td><td>{}</td><td>{}</td></tr>"#,
                text(&record.employee_id),
                text(record.employee_name.as_deref().unwrap_or("N/A")),
                text(record.department.as_deref().unwrap_or("N/A")),
                render_status_badge(record.status)
            );
        }
        format!(
            r#"{}<div class="table-wrapper"><table><thead><tr><th>Employee ID</th><th>Employee Name</th><th>Department</th><th>Status</th></tr></thead><tbody>{body}</tbody></table></div>"#,
            render_summary(&daily.summary, ["Total Records", "Present", "Absent"])
        )
    };

    format!(
        r#"<section class="table-container"><div class="table-header"><h2>📊 Attendance Overview</h2><p>Showing records for {}</p></div><form class="date-filter" method="post" action="/attendance/filter"><label for="records-date">Filter by Date:</label><input id="records-date" type="date" name="date" value="{}" max="{today}" /><button type="submit" class="btn btn-secondary">Show</button></form>{listing}</section>"#,
        daily.date.format("%A, %B %-d, %Y"),
        daily.date
    )
}

fn render_panel(panel: &EmployeeAttendancePanel) -> String {
    let employee = &panel.employee;
    let summary = panel
        .summary()
        .map(|summary| render_summary(&summary, ["Total Records", "Days Present", "Days Absent"]))
        .unwrap_or_default();

    let records = match panel.state() {
        ViewState::Loading => render_loading(),
        ViewState::Error(message) => render_error(&message, "/detail/error/dismiss"),
        ViewState::Empty => render_empty("📋", "No attendance records found for this employee"),
        ViewState::Populated(records) => {
            let mut html = String::new();
            for record in records {
                let _ = write!(
                    html,
                    r#"<div class="attendance-record"><div class="record-date">📅 {}</div>{}</div>"#,
                    record.date.format("%a, %b %-d, %Y"),
                    render_status_badge(record.status)
                );
            }
            html
        }
    };

    format!(
        r#"<section class="attendance-list"><div class="attendance-header"><div><h2>📋 Attendance: {}</h2><p class="subtitle">{} • {}</p></div><form method="post" action="/detail/close"><button class="close-btn" type="submit" title="Close">✕</button></form></div>{summary}<div class="attendance-records">{records}</div></section>"#,
        text(&employee.full_name),
        text(&employee.employee_id),
        text(&employee.department)
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>HRMS Lite</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #2b2a28;
      --muted: #8b857d;
      --accent: #667eea;
      --accent-2: #764ba2;
      --present: #28a745;
      --absent: #dc3545;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(47, 72, 88, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    .header {
      background: linear-gradient(135deg, var(--accent), var(--accent-2));
      color: white;
      padding: 28px 18px;
      text-align: center;
    }

    .header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .header p {
      margin: 6px 0 0;
      opacity: 0.85;
    }

    .container {
      width: min(1080px, 100%);
      margin: 0 auto;
      padding: 24px 18px 48px;
      display: grid;
      gap: 24px;
    }

    .nav-tabs {
      display: flex;
      gap: 8px;
    }

    .nav-tab {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      background: white;
      color: #6b645d;
      cursor: pointer;
    }

    .nav-tab.active {
      background: var(--accent);
      color: white;
    }

    .form-container,
    .table-container,
    .attendance-list {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .form-row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
      margin-bottom: 12px;
    }

    .form-group {
      display: grid;
      gap: 6px;
    }

    .form-group input,
    .form-group select,
    .date-filter input {
      padding: 10px 12px;
      border: 1px solid #ddd;
      border-radius: 6px;
      font-size: 1rem;
    }

    .form-error {
      color: var(--absent);
      font-size: 0.85rem;
    }

    .btn {
      border: none;
      border-radius: 8px;
      padding: 12px 20px;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
    }

    .btn-secondary {
      background: #eef0fb;
      color: var(--accent);
    }

    .btn:disabled {
      opacity: 0.6;
      cursor: not-allowed;
    }

    .success-message {
      background: #d4edda;
      color: #155724;
      padding: 12px 16px;
      border-radius: 8px;
      margin-bottom: 12px;
    }

    .error {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      background: #fee;
      color: #c33;
      padding: 12px 16px;
      border-radius: 8px;
      margin-bottom: 12px;
    }

    .error button,
    .close-btn {
      border: none;
      background: transparent;
      font-size: 1.1rem;
      cursor: pointer;
      color: inherit;
    }

    .loading,
    .empty-state {
      text-align: center;
      padding: 36px;
      color: var(--muted);
    }

    .empty-state-icon {
      font-size: 2.4rem;
    }

    .spinner {
      width: 32px;
      height: 32px;
      margin: 0 auto 12px;
      border: 3px solid #eee;
      border-top-color: var(--accent);
      border-radius: 50%;
      animation: spin 800ms linear infinite;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 12px;
      border-bottom: 1px solid #eee;
    }

    .table-wrapper {
      overflow-x: auto;
    }

    .employee-name {
      font-weight: 600;
    }

    .badge,
    .status-badge {
      display: inline-block;
      padding: 4px 10px;
      border-radius: 999px;
      font-size: 0.85rem;
    }

    .badge-dept {
      background: #eef0fb;
      color: var(--accent);
    }

    .status-present {
      background: #d4edda;
      color: #155724;
    }

    .status-absent {
      background: #f8d7da;
      color: #721c24;
    }

    .action-buttons {
      display: flex;
      gap: 8px;
    }

    .btn-sm {
      border: none;
      border-radius: 6px;
      padding: 6px 10px;
      cursor: pointer;
    }

    .btn-view {
      background: #eef0fb;
    }

    .btn-delete {
      background: #f8d7da;
    }

    .date-filter {
      display: flex;
      align-items: center;
      gap: 12px;
      padding: 16px 0;
      border-bottom: 1px solid #e0e0e0;
    }

    .attendance-header {
      display: flex;
      justify-content: space-between;
      align-items: flex-start;
    }

    .attendance-summary {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 16px;
      padding: 16px 0;
      text-align: center;
    }

    .summary-item-value {
      font-size: 1.3rem;
      font-weight: 700;
    }

    .summary-item-value.total {
      color: var(--accent);
    }

    .summary-item-value.present {
      color: var(--present);
    }

    .summary-item-value.absent {
      color: var(--absent);
    }

    .summary-item-label,
    .subtitle,
    .hint {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .attendance-record {
      display: flex;
      justify-content: space-between;
      padding: 12px 0;
      border-bottom: 1px solid #eee;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }
  </style>
</head>
<body>
  <header class="header">
    <h1>HRMS Lite</h1>
    <p>Human Resource Management System</p>
  </header>
  <main class="container">
    {{NAV}}
    {{CONTENT}}
  </main>
  <script>
    document.querySelectorAll('[data-expires-in]').forEach((el) => {
      setTimeout(() => el.remove(), Number(el.dataset.expiresIn));
    });
  </script>
</body>
</html>
"#;
