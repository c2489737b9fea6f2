pub mod career;
pub mod certification;
pub mod profile;
pub mod skill;
pub mod training;
pub mod work_record;

pub use career::CareerRepository;
pub use certification::CertificationRepository;
pub use profile::ProfileRepository;
pub use skill::SkillRepository;
pub use training::TrainingRepository;
pub use work_record::WorkRecordRepository;
