//! User-facing message catalog.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Arabic,
    English,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale '{0}' (expected 'ar' or 'en')")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Ok(Locale::Arabic),
            "en" | "english" => Ok(Locale::English),
            _ => Err(UnknownLocale(raw.to_string())),
        }
    }
}

impl Locale {
    pub fn required_fields_missing(self) -> &'static str {
        match self {
            Locale::Arabic => "يرجى ملء جميع الحقول المطلوبة",
            Locale::English => "Please fill all required fields",
        }
    }

    pub fn missing_configuration(self) -> &'static str {
        match self {
            Locale::Arabic => "إعدادات الخدمة غير مكتملة. يرجى ضبط عنوان الخدمة ومفتاح الوصول.",
            Locale::English => {
                "Service configuration is missing. Please set the service URL and access key."
            }
        }
    }

    pub fn save_failed(self, detail: &str) -> String {
        match self {
            Locale::Arabic => format!("فشل في حفظ البيانات: {detail}"),
            Locale::English => format!("Failed to save data: {detail}"),
        }
    }

    pub fn saved_but_email_failed(self) -> &'static str {
        match self {
            Locale::Arabic => {
                "تم حفظ البيانات بنجاح، لكن فشل في إرسال البريد الإلكتروني. سنتواصل معك قريباً."
            }
            Locale::English => {
                "Saved successfully, but the confirmation email failed. We will contact you soon."
            }
        }
    }

    pub fn saved_and_email_sent(self) -> &'static str {
        match self {
            Locale::Arabic => "تم حفظ البيانات بنجاح وتم إرسال بريد إلكتروني للتأكيد",
            Locale::English => "Saved successfully and a confirmation email was sent",
        }
    }

    pub fn unexpected_error(self, detail: &str) -> String {
        match self {
            Locale::Arabic => format!("حدث خطأ غير متوقع: {detail}"),
            Locale::English => format!("Unexpected error: {detail}"),
        }
    }
}
