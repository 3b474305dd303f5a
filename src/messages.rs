//! Localized answer templates.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate. Persona only changes tone, never meaning.

use crate::types::{Lang, Persona};

pub fn recognized(lang: Lang, persona: Persona, name: &str) -> String {
    match (lang, persona) {
        (Lang::Ru, Persona::Formal) => format!("Это {name}. Достопримечательность распознана."),
        (Lang::Ru, Persona::Humorous) => format!("Супер! Это {name} — квест засчитан!"),
        (Lang::Kk, Persona::Formal) => format!("Бұл — {name}. Нысан сәтті танылды."),
        (Lang::Kk, Persona::Humorous) => {
            format!("Супер! Бұл {name} – квест тапсырмасы орындалды!")
        }
        (Lang::En, Persona::Formal) => format!("This is {name}. The landmark has been recognized."),
        (Lang::En, Persona::Humorous) => format!("Great! That’s {name} — quest checkpoint completed!"),
    }
}

pub fn low_confidence(lang: Lang, persona: Persona) -> &'static str {
    match (lang, persona) {
        (Lang::Ru, Persona::Formal) => {
            "Не удалось уверенно определить объект. Попробуйте сфотографировать ближе."
        }
        (Lang::Ru, Persona::Humorous) => {
            "Хм, кажется, я что-то вижу, но не уверен. Подойдите поближе — я не кусаюсь!"
        }
        (Lang::Kk, Persona::Formal) => {
            "Нысанды сенімді анықтау мүмкін болмады. Жақынырақ түсіріп көріңіз."
        }
        (Lang::Kk, Persona::Humorous) => {
            "Хм, бір нәрсе көрінеді, бірақ сенімді емеспін. Жақынырақ келіп түсіріңізші!"
        }
        (Lang::En, Persona::Formal) => {
            "The landmark could not be identified with confidence. Try taking a closer photo."
        }
        (Lang::En, Persona::Humorous) => {
            "Hmm, I think I see something, but I'm squinting. Step a little closer and try again!"
        }
    }
}

pub fn not_recognized(lang: Lang, persona: Persona) -> &'static str {
    match (lang, persona) {
        (Lang::Ru, Persona::Formal) => "Не удалось распознать достопримечательность.",
        (Lang::Ru, Persona::Humorous) => {
            "Увы, эту достопримечательность я не узнаю. Может, попробуем другую?"
        }
        (Lang::Kk, Persona::Formal) => "Нысанды тану мүмкін болмады.",
        (Lang::Kk, Persona::Humorous) => {
            "Өкінішке қарай, бұл нысанды танымадым. Басқасын байқап көрейік пе?"
        }
        (Lang::En, Persona::Formal) => "Could not recognize the landmark.",
        (Lang::En, Persona::Humorous) => "Sorry, this one's a mystery to me. Shall we try another spot?",
    }
}

/// Generic bodies for error responses. Diagnostic detail stays in the logs.
pub const MISSING_FILE: &str = "file is required";
pub const INVALID_REQUEST: &str = "Expected multipart/form-data with a file field";
pub const FILE_TOO_LARGE: &str = "File too large";
pub const UNSUPPORTED_MEDIA_TYPE: &str = "Unsupported media type";
pub const PROVIDER_TIMEOUT: &str = "Recognition timed out, please try again";
pub const PROVIDER_FAILURE: &str = "Recognition service is unavailable, please try again";
pub const INTERNAL_ERROR: &str = "Internal error";
