//! Localized option lists and UI text.
//!
//! The option strings double as the encoder's input domain: the form offers
//! exactly these strings and `FeatureEncoder` matches them verbatim.

use serde::{Deserialize, Serialize};

/// Language of the form options and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Russian (the language the classifier's option lists were authored in)
    #[default]
    Ru,
    /// English
    En,
}

/// Categorical answer options, in form display order.
#[derive(Debug)]
pub struct OptionLabels {
    /// `[male, female]`
    pub sex: [&'static str; 2],
    /// `[typical angina, atypical angina, non-anginal pain, asymptomatic]`
    pub chest_pain: [&'static str; 4],
    /// `[> 120 mg/dl, <= 120 mg/dl]`
    pub fasting_bs: [&'static str; 2],
    /// `[normal, ST-T abnormality, LVH]`
    pub resting_ecg: [&'static str; 3],
    /// `[yes, no]`
    pub exercise_angina: [&'static str; 2],
    /// `[up, flat, down]`
    pub st_slope: [&'static str; 3],
}

/// Everything the presentation layer shows that depends on the language.
#[derive(Debug)]
pub struct UiText {
    pub app_title: &'static str,
    pub app_subtitle: &'static str,
    pub about: &'static str,

    pub form_title: &'static str,
    pub form_subtitle: &'static str,
    /// Field labels in feature order.
    pub field_labels: [&'static str; 11],
    pub invalid_number: &'static str,
    pub expected_integer: &'static str,

    pub analyze: &'static str,
    pub assessment_title: &'static str,
    pub probability_label: &'static str,
    pub likely_disease: &'static str,
    pub unlikely_disease: &'static str,
    pub prediction_error: &'static str,

    pub chat_title: &'static str,
    pub chat_placeholder: &'static str,
    pub chat_waiting: &'static str,
    pub chat_empty: &'static str,
    pub chat_error: &'static str,
    pub you: &'static str,
    pub assistant: &'static str,

    pub status_title: &'static str,
    pub model_loaded: &'static str,
    pub chat_configured: &'static str,
    pub assessments: &'static str,
    pub chat_turns: &'static str,
    pub actions_title: &'static str,
    pub new_assessment: &'static str,
    pub open_chat: &'static str,
    pub quit: &'static str,
    pub navigate: &'static str,
    pub choose: &'static str,
    pub sample_data: &'static str,
    pub back: &'static str,
    pub send: &'static str,
    pub edit_values: &'static str,
    pub retry: &'static str,

    pub disclaimer: &'static str,
}

/// Fixed system instruction sent with every chat prompt.
pub const PERSONA_RU: &str = "Вы профессиональный ассистент кардиолога. Вы помогаете с анализом результатов клинических данных пациента и даете рекомендации.";
pub const PERSONA_EN: &str = "You are a professional cardiologist's assistant. You help analyze the results of a patient's clinical data and give recommendations.";

static OPTIONS_RU: OptionLabels = OptionLabels {
    sex: ["М", "Ж"],
    chest_pain: [
        "Типичная стенокардия",
        "Атипичная стенокардия",
        "Боль, не связанная со стенокардией",
        "Бессимптомный",
    ],
    fasting_bs: ["> 120 мг/дл", "<= 120 мг/дл"],
    resting_ecg: ["Норма", "Аномалия зубца ST-T", "ГЛЖ"],
    exercise_angina: ["Да", "Нет"],
    st_slope: ["Вверх", "Плоский", "Вниз"],
};

static OPTIONS_EN: OptionLabels = OptionLabels {
    sex: ["male", "female"],
    chest_pain: [
        "typical angina",
        "atypical angina",
        "non-anginal pain",
        "asymptomatic",
    ],
    fasting_bs: [">120", "<=120"],
    resting_ecg: ["normal", "ST-T abnormality", "LVH"],
    exercise_angina: ["yes", "no"],
    st_slope: ["up", "flat", "down"],
};

static TEXT_RU: UiText = UiText {
    app_title: "Heartysis AI",
    app_subtitle: "Прогнозируем сердечные заболевания",
    about: "Модель принимает входные данные пациента и предсказывает вероятность наличия сердечного заболевания.",
    form_title: "Введите информацию о пациенте",
    form_subtitle: " │ 11 клинических признаков",
    field_labels: [
        "Возраст",
        "Пол",
        "Тип боли в груди",
        "Кровяное давление в покое (мм рт.ст.)",
        "Холестерин в сыворотке (мм/дл)",
        "Сахар в крови натощак",
        "ЭКГ в состоянии покоя",
        "Максимальная ЧСС",
        "Стенокардия при нагрузке",
        "Пиково-низкое значение (ST депрессия)",
        "ST Slope",
    ],
    invalid_number: "некорректное число",
    expected_integer: "ожидается целое число",
    analyze: "Анализ",
    assessment_title: "Результат анализа",
    probability_label: "Вероятность сердечных заболеваний:",
    likely_disease: "У пациента, скорее всего, есть заболевание сердца.",
    unlikely_disease: "Маловероятно, что у пациента есть сердечные заболевания.",
    prediction_error: "Во время предсказания произошла ошибка",
    chat_title: "Heartysis AI Chat Assistant",
    chat_placeholder: "Чем я могу вам помочь?",
    chat_waiting: "Генерируем ответ..",
    chat_empty: "История сообщений пуста.",
    chat_error: "Произошла ошибка во время генерации ответа",
    you: "Вы",
    assistant: "Ассистент",
    status_title: " Состояние ",
    model_loaded: "Модель загружена",
    chat_configured: "Ключ API чата",
    assessments: "Анализов за сеанс",
    chat_turns: "Сообщений в чате",
    actions_title: " Действия ",
    new_assessment: "Новый анализ",
    open_chat: "Чат с ассистентом",
    quit: "Выход",
    navigate: "Поля",
    choose: "Вариант",
    sample_data: "Пример",
    back: "Назад",
    send: "Отправить",
    edit_values: "Изменить данные",
    retry: "Повторить",
    disclaimer: "Результат носит ориентировочный характер и не заменяет консультацию врача.",
};

static TEXT_EN: UiText = UiText {
    app_title: "Heartysis AI",
    app_subtitle: "Predicting heart disease",
    about: "The model takes a patient's clinical data and predicts the probability of heart disease.",
    form_title: "Enter patient information",
    form_subtitle: " │ 11 clinical features",
    field_labels: [
        "Age",
        "Sex",
        "Chest pain type",
        "Resting blood pressure (mm Hg)",
        "Serum cholesterol (mg/dl)",
        "Fasting blood sugar",
        "Resting ECG",
        "Max heart rate",
        "Exercise-induced angina",
        "Oldpeak (ST depression)",
        "ST slope",
    ],
    invalid_number: "invalid number",
    expected_integer: "expected a whole number",
    analyze: "Analyze",
    assessment_title: "Analysis result",
    probability_label: "Probability of heart disease:",
    likely_disease: "The patient most likely has heart disease.",
    unlikely_disease: "The patient is unlikely to have heart disease.",
    prediction_error: "An error occurred during prediction",
    chat_title: "Heartysis AI Chat Assistant",
    chat_placeholder: "How can I help you?",
    chat_waiting: "Generating a reply..",
    chat_empty: "No messages yet.",
    chat_error: "An error occurred while generating the reply",
    you: "You",
    assistant: "Assistant",
    status_title: " Status ",
    model_loaded: "Model loaded",
    chat_configured: "Chat API key",
    assessments: "Analyses this session",
    chat_turns: "Chat messages",
    actions_title: " Actions ",
    new_assessment: "New analysis",
    open_chat: "Chat with assistant",
    quit: "Quit",
    navigate: "Fields",
    choose: "Option",
    sample_data: "Sample",
    back: "Back",
    send: "Send",
    edit_values: "Edit values",
    retry: "Retry",
    disclaimer: "Indicative estimate only; it does not replace a professional medical evaluation.",
};

impl Locale {
    /// Option strings the form offers and the encoder recognizes.
    #[must_use]
    pub fn options(self) -> &'static OptionLabels {
        match self {
            Self::Ru => &OPTIONS_RU,
            Self::En => &OPTIONS_EN,
        }
    }

    #[must_use]
    pub fn text(self) -> &'static UiText {
        match self {
            Self::Ru => &TEXT_RU,
            Self::En => &TEXT_EN,
        }
    }

    /// System instruction for the chat assistant.
    #[must_use]
    pub fn persona(self) -> &'static str {
        match self {
            Self::Ru => PERSONA_RU,
            Self::En => PERSONA_EN,
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru-ru" | "russian" => Ok(Self::Ru),
            "en" | "en-us" | "en-gb" | "english" => Ok(Self::En),
            other => Err(format!("Unsupported locale '{other}' (expected 'ru' or 'en')")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ru => write!(f, "ru"),
            Self::En => write!(f, "en"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("ru".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_option_lists_have_no_duplicates() {
        for locale in [Locale::Ru, Locale::En] {
            let o = locale.options();
            let all: Vec<&str> = o
                .chest_pain
                .iter()
                .chain(o.resting_ecg.iter())
                .chain(o.st_slope.iter())
                .copied()
                .collect();
            let mut dedup = all.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(all.len(), dedup.len(), "duplicate option in {locale}");
        }
    }
}
