use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Appointment, AppointmentStatus, PasswordReset, Role, User, Vehicle};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_dt(dt: &NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DT_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, password_digest, role, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_digest,
            user.role.as_str(),
            user.active,
        ],
    )?;
    Ok(())
}

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    let role_str: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_digest: row.get(3)?,
        role: Role::from_str(&role_str),
        active: row.get(5)?,
    })
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password_digest, role, active FROM users WHERE email = ?1",
    )?;
    match stmt.query_row(params![email], parse_user_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let mut stmt = conn
        .prepare("SELECT id, name, email, password_digest, role, active FROM users WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_user_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection) -> anyhow::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password_digest, role, active FROM users ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], parse_user_row)?;
    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn update_user(conn: &Connection, user: &User) -> anyhow::Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET name = ?2, email = ?3, password_digest = ?4, role = ?5, active = ?6
         WHERE id = ?1",
        params![
            user.id,
            user.name,
            user.email,
            user.password_digest,
            user.role.as_str(),
            user.active,
        ],
    )?;
    Ok(updated > 0)
}

pub fn delete_user(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn count_users(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

// ── Password resets ──

pub fn create_password_reset(conn: &Connection, reset: &PasswordReset) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO password_resets (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![reset.token, reset.user_id, format_dt(&reset.expires_at)],
    )?;
    Ok(())
}

pub fn get_password_reset(conn: &Connection, token: &str) -> anyhow::Result<Option<PasswordReset>> {
    let mut stmt =
        conn.prepare("SELECT token, user_id, expires_at FROM password_resets WHERE token = ?1")?;
    match stmt.query_row(params![token], |row| {
        let expires: String = row.get(2)?;
        Ok(PasswordReset {
            token: row.get(0)?,
            user_id: row.get(1)?,
            expires_at: parse_dt(&expires),
        })
    }) {
        Ok(reset) => Ok(Some(reset)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_password_reset(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM password_resets WHERE token = ?1", params![token])?;
    Ok(deleted > 0)
}

// A fresh request supersedes any token still floating around for the account.
pub fn delete_password_resets_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM password_resets WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(deleted)
}

// ── Vehicles ──

pub fn create_vehicle(conn: &Connection, vehicle: &Vehicle) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO vehicles (id, plate, model, active) VALUES (?1, ?2, ?3, ?4)",
        params![vehicle.id, vehicle.plate, vehicle.model, vehicle.active],
    )?;
    Ok(())
}

fn parse_vehicle_row(row: &Row) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        plate: row.get(1)?,
        model: row.get(2)?,
        active: row.get(3)?,
    })
}

pub fn get_vehicle(conn: &Connection, id: &str) -> anyhow::Result<Option<Vehicle>> {
    let mut stmt = conn.prepare("SELECT id, plate, model, active FROM vehicles WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_vehicle_row) {
        Ok(vehicle) => Ok(Some(vehicle)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_vehicles(conn: &Connection) -> anyhow::Result<Vec<Vehicle>> {
    let mut stmt = conn.prepare("SELECT id, plate, model, active FROM vehicles ORDER BY plate ASC")?;
    let rows = stmt.query_map([], parse_vehicle_row)?;
    let mut vehicles = vec![];
    for row in rows {
        vehicles.push(row?);
    }
    Ok(vehicles)
}

pub fn update_vehicle(conn: &Connection, vehicle: &Vehicle) -> anyhow::Result<bool> {
    let updated = conn.execute(
        "UPDATE vehicles SET plate = ?2, model = ?3, active = ?4 WHERE id = ?1",
        params![vehicle.id, vehicle.plate, vehicle.model, vehicle.active],
    )?;
    Ok(updated > 0)
}

pub fn delete_vehicle(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM vehicles WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ── Appointments ──

const APPOINTMENT_COLUMNS: &str = "id, vehicle_ref, departure_at, return_at, destination, reason, \
                                   status, owner_ref, completion_note, created_at, updated_at";

fn parse_appointment_row(row: &Row) -> rusqlite::Result<Appointment> {
    let departure: String = row.get(2)?;
    let ret: String = row.get(3)?;
    let status_str: String = row.get(6)?;
    let created: String = row.get(9)?;
    let updated: String = row.get(10)?;

    Ok(Appointment {
        id: row.get(0)?,
        vehicle_ref: row.get(1)?,
        departure_at: parse_dt(&departure),
        return_at: parse_dt(&ret),
        destination: row.get(4)?,
        reason: row.get(5)?,
        status: AppointmentStatus::from_str(&status_str),
        owner_ref: row.get(7)?,
        completion_note: row.get(8)?,
        created_at: parse_dt(&created),
        updated_at: parse_dt(&updated),
    })
}

pub fn create_appointment(conn: &Connection, apt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, vehicle_ref, departure_at, return_at, destination, reason, \
         status, owner_ref, completion_note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            apt.id,
            apt.vehicle_ref,
            format_dt(&apt.departure_at),
            format_dt(&apt.return_at),
            apt.destination,
            apt.reason,
            apt.status.as_str(),
            apt.owner_ref,
            apt.completion_note,
            format_dt(&apt.created_at),
            format_dt(&apt.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;
    match stmt.query_row(params![id], parse_appointment_row) {
        Ok(apt) => Ok(Some(apt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_appointments(conn: &Connection) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY departure_at ASC"
    ))?;
    let rows = stmt.query_map([], parse_appointment_row)?;
    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn list_appointments_for_owner(
    conn: &Connection,
    owner_ref: &str,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE owner_ref = ?1 \
         ORDER BY departure_at ASC"
    ))?;
    let rows = stmt.query_map(params![owner_ref], parse_appointment_row)?;
    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn save_appointment(conn: &Connection, apt: &Appointment) -> anyhow::Result<bool> {
    let updated = conn.execute(
        "UPDATE appointments SET vehicle_ref = ?2, departure_at = ?3, return_at = ?4, \
         destination = ?5, reason = ?6, status = ?7, completion_note = ?8, updated_at = ?9
         WHERE id = ?1",
        params![
            apt.id,
            apt.vehicle_ref,
            format_dt(&apt.departure_at),
            format_dt(&apt.return_at),
            apt.destination,
            apt.reason,
            apt.status.as_str(),
            apt.completion_note,
            format_dt(&apt.updated_at),
        ],
    )?;
    Ok(updated > 0)
}

pub fn delete_appointment(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn sample_appointment(id: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            vehicle_ref: "ABC-1234".to_string(),
            departure_at: dt("2025-06-16 09:00"),
            return_at: dt("2025-06-16 18:00"),
            destination: "Av. Paulista".to_string(),
            reason: "Client technical visit".to_string(),
            status: AppointmentStatus::Scheduled,
            owner_ref: "user-1".to_string(),
            completion_note: None,
            created_at: dt("2025-06-10 08:00"),
            updated_at: dt("2025-06-10 08:00"),
        }
    }

    #[test]
    fn test_appointment_round_trip() {
        let conn = setup_db();
        let apt = sample_appointment("apt-1");
        create_appointment(&conn, &apt).unwrap();

        let loaded = get_appointment(&conn, "apt-1").unwrap().unwrap();
        assert_eq!(loaded.vehicle_ref, "ABC-1234");
        assert_eq!(loaded.departure_at, dt("2025-06-16 09:00"));
        assert_eq!(loaded.status, AppointmentStatus::Scheduled);
        assert!(loaded.completion_note.is_none());
    }

    #[test]
    fn test_save_appointment_persists_transition() {
        let conn = setup_db();
        let mut apt = sample_appointment("apt-1");
        create_appointment(&conn, &apt).unwrap();

        apt.start().unwrap();
        apt.finish(Some("done early")).unwrap();
        assert!(save_appointment(&conn, &apt).unwrap());

        let loaded = get_appointment(&conn, "apt-1").unwrap().unwrap();
        assert_eq!(loaded.status, AppointmentStatus::Completed);
        assert_eq!(loaded.completion_note.as_deref(), Some("done early"));
    }

    #[test]
    fn test_list_appointments_for_owner() {
        let conn = setup_db();
        let mut mine = sample_appointment("apt-1");
        mine.owner_ref = "user-1".to_string();
        let mut theirs = sample_appointment("apt-2");
        theirs.owner_ref = "user-2".to_string();
        create_appointment(&conn, &mine).unwrap();
        create_appointment(&conn, &theirs).unwrap();

        let listed = list_appointments_for_owner(&conn, "user-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "apt-1");
        assert_eq!(list_appointments(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_user_lookup_by_email() {
        let conn = setup_db();
        let user = User {
            id: "user-1".to_string(),
            name: "Maria Oliveira".to_string(),
            email: "maria@example.com".to_string(),
            password_digest: "digest".to_string(),
            role: Role::Admin,
            active: true,
        };
        create_user(&conn, &user).unwrap();

        let loaded = get_user_by_email(&conn, "maria@example.com").unwrap().unwrap();
        assert_eq!(loaded.role, Role::Admin);
        assert!(get_user_by_email(&conn, "nobody@example.com")
            .unwrap()
            .is_none());
        assert_eq!(count_users(&conn).unwrap(), 1);
    }

    #[test]
    fn test_password_reset_round_trip() {
        let conn = setup_db();
        let reset = PasswordReset {
            token: "tok-1".to_string(),
            user_id: "user-1".to_string(),
            expires_at: dt("2025-06-16 10:00"),
        };
        create_password_reset(&conn, &reset).unwrap();

        let loaded = get_password_reset(&conn, "tok-1").unwrap().unwrap();
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.expires_at, dt("2025-06-16 10:00"));

        // a second request invalidates everything issued for the account
        let newer = PasswordReset {
            token: "tok-2".to_string(),
            ..reset
        };
        delete_password_resets_for_user(&conn, "user-1").unwrap();
        create_password_reset(&conn, &newer).unwrap();
        assert!(get_password_reset(&conn, "tok-1").unwrap().is_none());

        assert!(delete_password_reset(&conn, "tok-2").unwrap());
        assert!(get_password_reset(&conn, "tok-2").unwrap().is_none());
    }

    #[test]
    fn test_vehicle_crud() {
        let conn = setup_db();
        let mut vehicle = Vehicle {
            id: "veh-1".to_string(),
            plate: "ABC-1234".to_string(),
            model: "Fiorino".to_string(),
            active: true,
        };
        create_vehicle(&conn, &vehicle).unwrap();
        assert_eq!(list_vehicles(&conn).unwrap().len(), 1);

        vehicle.active = false;
        assert!(update_vehicle(&conn, &vehicle).unwrap());
        assert!(!get_vehicle(&conn, "veh-1").unwrap().unwrap().active);

        assert!(delete_vehicle(&conn, "veh-1").unwrap());
        assert!(get_vehicle(&conn, "veh-1").unwrap().is_none());
    }
}
