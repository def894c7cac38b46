use bootgate_model::Role;

/// Sniff the role from the literal command line.
///
/// Arguments are joined with single spaces and matched case-sensitively, in
/// priority order; the first rule that matches wins:
/// 1. contains `gunicorn`                 → [`Role::WebServer`]
/// 2. contains `celery` and `worker`      → [`Role::QueueWorker`]
/// 3. contains `celery` and `beat`        → [`Role::Scheduler`]
/// 4. anything else                       → [`Role::Passthrough`]
///
/// Matching is on substrings, so `/opt/gunicorn-tools/run` counts as a web
/// server. Prefer an explicit role where that matters.
pub fn classify_command(argv: &[String]) -> Role {
    let line = argv.join(" ");

    if line.contains("gunicorn") {
        Role::WebServer
    } else if line.contains("celery") && line.contains("worker") {
        Role::QueueWorker
    } else if line.contains("celery") && line.contains("beat") {
        Role::Scheduler
    } else {
        Role::Passthrough
    }
}

/// Whether the gate must wait for the database before dispatching.
///
/// True for every non-passthrough role, and for passthrough commands that
/// invoke Django's `manage.py`.
pub fn needs_database(role: Role, argv: &[String]) -> bool {
    role.needs_database() || argv.iter().any(|a| a.contains("manage.py"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn gunicorn_anywhere_is_web_server() {
        for line in [
            "gunicorn",
            "gunicorn config.wsgi:application",
            "/usr/local/bin/gunicorn -w 2",
            "celery -A config worker --gunicorn-compat",
            "celery beat with gunicorn",
            "python -m gunicorn",
        ] {
            assert_eq!(classify_command(&argv(line)), Role::WebServer, "{line}");
        }
    }

    #[test]
    fn gunicorn_match_is_case_sensitive() {
        assert_eq!(classify_command(&argv("Gunicorn")), Role::Passthrough);
    }

    #[test]
    fn celery_worker_is_queue_worker() {
        for line in [
            "celery -A config worker -l info",
            "celery -A config worker beat",
            "/venv/bin/celery worker",
            "celeryworker",
        ] {
            assert_eq!(classify_command(&argv(line)), Role::QueueWorker, "{line}");
        }
    }

    #[test]
    fn celery_beat_is_scheduler() {
        for line in [
            "celery -A config beat -l info",
            "celery beat --pidfile=/tmp/beat.pid",
        ] {
            assert_eq!(classify_command(&argv(line)), Role::Scheduler, "{line}");
        }
    }

    #[test]
    fn everything_else_is_passthrough() {
        for line in [
            "python manage.py shell",
            "worker",
            "beat",
            "celery flower",
            "bash",
        ] {
            assert_eq!(classify_command(&argv(line)), Role::Passthrough, "{line}");
        }
    }

    #[test]
    fn arguments_are_joined_with_single_spaces() {
        // Joined with a space, so "cel" + "ery" does not match.
        assert_eq!(classify_command(&argv("cel ery worker")), Role::Passthrough);
        assert_eq!(classify_command(&[]), Role::Passthrough);
    }

    #[test]
    fn manage_py_passthrough_waits_for_database() {
        assert!(needs_database(
            Role::Passthrough,
            &argv("python manage.py migrate")
        ));
        assert!(!needs_database(Role::Passthrough, &argv("bash -c true")));
        assert!(needs_database(Role::QueueWorker, &argv("anything")));
    }
}
