use chrono::NaiveDate;
use enrollsync_core::{
    errors::EnrollResult,
    models::{enrollment::Enrollment, teacher::Teacher},
};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAvailabilityPattern, DbHoliday, DbTimeSlot};

// Mock repositories for testing
mock! {
    pub TeacherRepo {
        pub async fn load_teacher(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<Teacher>>;
    }
}

mock! {
    pub AvailabilityRepo {
        pub async fn get_active_patterns(
            &self,
            teacher_id: Uuid,
        ) -> eyre::Result<Vec<DbAvailabilityPattern>>;

        pub async fn get_pattern(
            &self,
            teacher_id: Uuid,
            pattern_id: Uuid,
        ) -> eyre::Result<Option<DbAvailabilityPattern>>;
    }
}

mock! {
    pub HolidayRepo {
        pub async fn get_holidays_in_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> eyre::Result<Vec<DbHoliday>>;
    }
}

mock! {
    pub TimeSlotRepo {
        pub async fn get_time_slots_for_teacher(
            &self,
            teacher_id: Uuid,
            start: NaiveDate,
            end: NaiveDate,
            day_of_week: Option<u8>,
        ) -> eyre::Result<Vec<DbTimeSlot>>;

        pub async fn get_time_slots_by_ids(
            &self,
            ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbTimeSlot>>;
    }
}

mock! {
    pub EnrollmentRepo {
        pub async fn create_enrollment(
            &self,
            student_id: Uuid,
            course_id: Uuid,
            teacher_id: Option<Uuid>,
            slot_ids: Vec<Uuid>,
        ) -> EnrollResult<Enrollment>;

        pub async fn cancel_enrollment(
            &self,
            id: Uuid,
        ) -> EnrollResult<usize>;
    }
}
