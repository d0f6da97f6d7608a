pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    email TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS habits (
    user_email TEXT NOT NULL REFERENCES users(email) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    kind TEXT NOT NULL,
    color TEXT NOT NULL,
    recurrence TEXT NOT NULL,
    goal_value REAL,
    goal_unit TEXT,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (user_email, name)
);

CREATE TABLE IF NOT EXISTS habit_intervals (
    user_email TEXT NOT NULL,
    habit_name TEXT NOT NULL,
    increment_days INTEGER NOT NULL,
    PRIMARY KEY (user_email, habit_name),
    FOREIGN KEY (user_email, habit_name)
        REFERENCES habits(user_email, name) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS habit_days (
    user_email TEXT NOT NULL,
    habit_name TEXT NOT NULL,
    weekday TEXT NOT NULL,
    PRIMARY KEY (user_email, habit_name, weekday),
    FOREIGN KEY (user_email, habit_name)
        REFERENCES habits(user_email, name) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS habit_instances (
    user_email TEXT NOT NULL,
    habit_name TEXT NOT NULL,
    due_date TEXT NOT NULL,
    PRIMARY KEY (user_email, habit_name, due_date),
    FOREIGN KEY (user_email, habit_name)
        REFERENCES habits(user_email, name) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS habit_progress (
    user_email TEXT NOT NULL,
    habit_name TEXT NOT NULL,
    progress_date TEXT NOT NULL,
    progress REAL NOT NULL DEFAULT 0,
    completed INTEGER NOT NULL DEFAULT 0,
    streak INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_email, habit_name, progress_date),
    FOREIGN KEY (user_email, habit_name)
        REFERENCES habits(user_email, name) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_instances_user_due ON habit_instances(user_email, due_date);
CREATE INDEX IF NOT EXISTS idx_progress_user_date ON habit_progress(user_email, progress_date);
"#;
