pub mod flashcard;
pub mod lesson_path;
pub mod menu;
pub mod phase_list;
pub mod progress_bar;
pub mod script_card;
