//! # Enrollment validation
//!
//! Read-only checks over a proposed enrollment. Every check runs and appends
//! its findings so the caller sees all problems at once; the outcome is valid
//! only when no check reported anything.

mod policy;

pub use policy::{ValidationPolicy, DEFAULT_MIN_HOURS_RATIO, DEFAULT_NOTICE_HOURS};

use chrono::{TimeZone, Utc};

use crate::{
    models::{
        enrollment::{
            CourseRequirements, CourseType, EnrollmentRequest, ErrorCode, ValidationError,
            ValidationOutcome,
        },
        teacher::Teacher,
        time_slot::TimeSlot,
    },
    scheduling::{capacity, overlap},
};

const FIELD_GENERAL: &str = "general";
const FIELD_TEACHER: &str = "teacherId";
const FIELD_SLOTS: &str = "selectedSlots";
const FIELD_REQUIREMENTS: &str = "requirements";

#[derive(Debug, Clone, Default)]
pub struct EnrollmentValidator {
    policy: ValidationPolicy,
}

impl EnrollmentValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Runs every check against `request`.
    ///
    /// `teacher` is the result of the teacher lookup; `None` means the lookup
    /// found nothing (or no teacher was chosen).
    pub fn validate(
        &self,
        request: &EnrollmentRequest,
        teacher: Option<&Teacher>,
        requirements: &CourseRequirements,
    ) -> ValidationOutcome {
        let mut errors = Vec::new();
        self.check_request(request, &mut errors);
        check_requirements(requirements, &mut errors);
        // A teacher is optional for self-paced courses; a scheduled course
        // without one already reported TEACHER_REQUIRED.
        if request.teacher_id.is_some() || teacher.is_some() {
            self.check_teacher(teacher, &mut errors);
        }
        self.check_slots(request, teacher, requirements, &mut errors);
        ValidationOutcome::from(errors)
    }

    /// Teacher checks only, for inline feedback while the form is filled in.
    pub fn validate_teacher(&self, teacher: Option<&Teacher>) -> ValidationOutcome {
        let mut errors = Vec::new();
        self.check_teacher(teacher, &mut errors);
        ValidationOutcome::from(errors)
    }

    /// Requirement and slot checks: availability, hours, overlap and notice.
    pub fn validate_slots(
        &self,
        request: &EnrollmentRequest,
        requirements: &CourseRequirements,
    ) -> ValidationOutcome {
        let mut errors = Vec::new();
        check_requirements(requirements, &mut errors);
        self.check_slots(request, None, requirements, &mut errors);
        ValidationOutcome::from(errors)
    }

    fn check_request(&self, request: &EnrollmentRequest, errors: &mut Vec<ValidationError>) {
        if request.course_id.is_none() {
            errors.push(
                ValidationError::new(FIELD_GENERAL, "Dados de matrícula incompletos")
                    .with_code(ErrorCode::IncompleteData),
            );
        }

        if request.course_type == CourseType::Scheduled && request.teacher_id.is_none() {
            errors.push(
                ValidationError::new(
                    FIELD_TEACHER,
                    "Professor é obrigatório para cursos agendados",
                )
                .with_code(ErrorCode::TeacherRequired),
            );
        }
    }

    fn check_teacher(&self, teacher: Option<&Teacher>, errors: &mut Vec<ValidationError>) {
        let Some(teacher) = teacher else {
            errors.push(
                ValidationError::new(FIELD_TEACHER, "Professor deve ser selecionado")
                    .with_code(ErrorCode::TeacherNotFound),
            );
            return;
        };

        if !teacher.is_active {
            errors.push(ValidationError::new(
                FIELD_TEACHER,
                "Professor selecionado não está ativo",
            ));
        }

        if !teacher.availability.iter().any(|pattern| pattern.is_active) {
            errors.push(
                ValidationError::new(
                    FIELD_TEACHER,
                    "Professor selecionado não possui horários disponíveis",
                )
                .with_code(ErrorCode::NoAvailability),
            );
        }
    }

    fn check_slots(
        &self,
        request: &EnrollmentRequest,
        teacher: Option<&Teacher>,
        requirements: &CourseRequirements,
        errors: &mut Vec<ValidationError>,
    ) {
        let slots = &request.selected_slots;
        if slots.is_empty() {
            errors.push(ValidationError::new(
                FIELD_SLOTS,
                "Pelo menos um horário deve ser selecionado",
            ));
            return;
        }

        for (index, slot) in slots.iter().enumerate() {
            check_slot(index, slot, teacher, errors);
        }

        self.check_hours(request.total_hours(), requirements, errors);

        let overlaps = overlap::find_overlaps(slots);
        if !overlaps.is_empty() {
            let details = overlaps
                .iter()
                .map(|o| {
                    format!(
                        "{}: {} e {}",
                        o.date.format("%Y-%m-%d"),
                        o.first.time_range(),
                        o.second.time_range()
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            errors.push(
                ValidationError::new(FIELD_SLOTS, format!("Conflito de horário em {}", details))
                    .with_code(ErrorCode::TimeOverlap),
            );
        }

        self.check_notice(request, errors);
    }

    fn check_hours(
        &self,
        selected_hours: f64,
        requirements: &CourseRequirements,
        errors: &mut Vec<ValidationError>,
    ) {
        let minimum_hours = self.policy.minimum_hours(requirements);
        // Float sums of fractional durations can land a hair under an exact target.
        if selected_hours + 1e-9 < minimum_hours {
            errors.push(
                ValidationError::new(
                    FIELD_SLOTS,
                    format!(
                        "Selecione pelo menos {}h de aulas ({:.1}h/{}h)",
                        format_hours(minimum_hours),
                        selected_hours,
                        format_hours(requirements.total_hours)
                    ),
                )
                .with_code(ErrorCode::InsufficientHours),
            );
        }
    }

    fn check_notice(&self, request: &EnrollmentRequest, errors: &mut Vec<ValidationError>) {
        let Some(earliest) = request.selected_slots.iter().map(TimeSlot::day_start).min() else {
            return;
        };

        let lead_time = Utc.from_utc_datetime(&earliest) - request.requested_at;
        if lead_time < self.policy.notice_period {
            errors.push(
                ValidationError::new(
                    FIELD_SLOTS,
                    format!(
                        "Matrícula deve ser feita com pelo menos {} horas de antecedência",
                        self.policy.notice_period.num_hours()
                    ),
                )
                .with_code(ErrorCode::InsufficientNotice),
            );
        }
    }
}

/// Course hours come from the caller; a non-positive total would make the
/// hours check vacuous.
fn check_requirements(requirements: &CourseRequirements, errors: &mut Vec<ValidationError>) {
    let fields = [
        ("totalHours", requirements.total_hours, "Carga horária do curso inválida"),
        (
            "sessionDuration",
            requirements.session_duration,
            "Duração da sessão inválida",
        ),
    ];
    for (field, value, message) in fields {
        if !(value.is_finite() && value > 0.0) {
            errors.push(
                ValidationError::new(format!("{}.{}", FIELD_REQUIREMENTS, field), message)
                    .with_code(ErrorCode::ValidationError),
            );
        }
    }
}

fn check_slot(
    index: usize,
    slot: &TimeSlot,
    teacher: Option<&Teacher>,
    errors: &mut Vec<ValidationError>,
) {
    let field = format!("{}[{}]", FIELD_SLOTS, index);
    let range = slot.time_range();

    if !slot.is_well_formed() {
        errors.push(
            ValidationError::new(
                format!("{}.endTime", field),
                "Horário final deve ser posterior ao horário inicial",
            )
            .with_code(ErrorCode::ValidationError),
        );
    }

    if let Some(teacher) = teacher {
        if slot.teacher_id != teacher.id {
            errors.push(
                ValidationError::new(
                    field.clone(),
                    format!("Horário {} não pertence ao professor selecionado", range),
                )
                .with_code(ErrorCode::SlotUnavailable),
            );
        }
    }

    if !slot.is_available {
        errors.push(
            ValidationError::new(
                field.clone(),
                format!("Horário {} não está disponível", range),
            )
            .with_code(ErrorCode::SlotUnavailable),
        );
    }

    if !capacity::can_admit(slot) {
        errors.push(
            ValidationError::new(field.clone(), format!("Horário {} está lotado", range))
                .with_code(ErrorCode::CapacityExceeded),
        );
    }

    if let Some(reason) = &slot.conflict_reason {
        errors.push(
            ValidationError::new(field, format!("Conflito: {}", reason))
                .with_code(ErrorCode::SlotConflict),
        );
    }
}

/// Hours rounded to two decimals, without a trailing `.0` for whole values.
fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    format!("{}", rounded)
}
