pub mod d400_appointments;

pub use d400_appointments::ui::AppointmentsDashboard;
