pub mod intro;
pub mod loading;
pub mod results;
pub mod round_break;
pub mod swipe_card;
