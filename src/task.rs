//! Captcha-type parameter builders.
//!
//! Every supported captcha type is a variant of the closed [`CaptchaTask`]
//! sum type, carrying the fields that type requires. Validation happens at
//! construction time, before any network call: an unknown type name or a
//! missing required field never reaches the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SolverError};

/// Names of the supported captcha task types, as sent in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaType {
    ImageToTextTask,
    ReCaptchaV2Task,
    ReCaptchaV2TaskProxyLess,
    ReCaptchaV2EnterpriseTask,
    ReCaptchaV2EnterpriseTaskProxyless,
    ReCaptchaV3Task,
    ReCaptchaV3TaskProxyless,
    HCaptchaTask,
    HCaptchaTaskProxyless,
    GeetestTask,
    GeetestTaskProxyless,
    FuncaptchaTask,
    FuncaptchaTaskProxyless,
    MtCaptchaTask,
    DatadomeSliderTask,
    AntiTurnstileTaskProxyLess,
}

impl CaptchaType {
    /// Returns the string representation for API calls.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaType::ImageToTextTask => "ImageToTextTask",
            CaptchaType::ReCaptchaV2Task => "ReCaptchaV2Task",
            CaptchaType::ReCaptchaV2TaskProxyLess => "ReCaptchaV2TaskProxyLess",
            CaptchaType::ReCaptchaV2EnterpriseTask => "ReCaptchaV2EnterpriseTask",
            CaptchaType::ReCaptchaV2EnterpriseTaskProxyless => "ReCaptchaV2EnterpriseTaskProxyless",
            CaptchaType::ReCaptchaV3Task => "ReCaptchaV3Task",
            CaptchaType::ReCaptchaV3TaskProxyless => "ReCaptchaV3TaskProxyless",
            CaptchaType::HCaptchaTask => "HCaptchaTask",
            CaptchaType::HCaptchaTaskProxyless => "HCaptchaTaskProxyless",
            CaptchaType::GeetestTask => "GeetestTask",
            CaptchaType::GeetestTaskProxyless => "GeetestTaskProxyless",
            CaptchaType::FuncaptchaTask => "FuncaptchaTask",
            CaptchaType::FuncaptchaTaskProxyless => "FuncaptchaTaskProxyless",
            CaptchaType::MtCaptchaTask => "MtCaptchaTask",
            CaptchaType::DatadomeSliderTask => "DatadomeSliderTask",
            CaptchaType::AntiTurnstileTaskProxyLess => "AntiTurnstileTaskProxyLess",
        }
    }

    /// Looks a type up by its wire name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ImageToTextTask" => Ok(CaptchaType::ImageToTextTask),
            "ReCaptchaV2Task" => Ok(CaptchaType::ReCaptchaV2Task),
            "ReCaptchaV2TaskProxyLess" => Ok(CaptchaType::ReCaptchaV2TaskProxyLess),
            "ReCaptchaV2EnterpriseTask" => Ok(CaptchaType::ReCaptchaV2EnterpriseTask),
            "ReCaptchaV2EnterpriseTaskProxyless" => {
                Ok(CaptchaType::ReCaptchaV2EnterpriseTaskProxyless)
            }
            "ReCaptchaV3Task" => Ok(CaptchaType::ReCaptchaV3Task),
            "ReCaptchaV3TaskProxyless" => Ok(CaptchaType::ReCaptchaV3TaskProxyless),
            "HCaptchaTask" => Ok(CaptchaType::HCaptchaTask),
            "HCaptchaTaskProxyless" => Ok(CaptchaType::HCaptchaTaskProxyless),
            "GeetestTask" => Ok(CaptchaType::GeetestTask),
            "GeetestTaskProxyless" => Ok(CaptchaType::GeetestTaskProxyless),
            "FuncaptchaTask" => Ok(CaptchaType::FuncaptchaTask),
            "FuncaptchaTaskProxyless" => Ok(CaptchaType::FuncaptchaTaskProxyless),
            "MtCaptchaTask" => Ok(CaptchaType::MtCaptchaTask),
            "DatadomeSliderTask" => Ok(CaptchaType::DatadomeSliderTask),
            "AntiTurnstileTaskProxyLess" => Ok(CaptchaType::AntiTurnstileTaskProxyLess),
            other => Err(SolverError::UnsupportedType(other.to_string())),
        }
    }

    /// Types that route the remote solver through the caller's proxy.
    fn requires_proxy(&self) -> bool {
        matches!(
            self,
            CaptchaType::ReCaptchaV2Task
                | CaptchaType::ReCaptchaV2EnterpriseTask
                | CaptchaType::ReCaptchaV3Task
                | CaptchaType::HCaptchaTask
                | CaptchaType::GeetestTask
                | CaptchaType::FuncaptchaTask
                | CaptchaType::MtCaptchaTask
                | CaptchaType::DatadomeSliderTask
        )
    }
}

impl std::fmt::Display for CaptchaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Image recognition task fields.
#[derive(Debug, Clone, Serialize)]
pub struct ImageToTextTask {
    /// Base64-encoded image body
    pub body: String,
    /// Recognition module name, e.g. `common`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// ReCaptcha v2 task fields, shared by the proxied, proxyless and
/// enterprise flavors.
#[derive(Debug, Clone, Serialize)]
pub struct ReCaptchaV2Task {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websiteKey")]
    pub website_key: String,
    #[serde(rename = "isInvisible", skip_serializing_if = "Option::is_none")]
    pub is_invisible: Option<bool>,
    #[serde(rename = "enterprisePayload", skip_serializing_if = "Option::is_none")]
    pub enterprise_payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// ReCaptcha v3 task fields.
#[derive(Debug, Clone, Serialize)]
pub struct ReCaptchaV3Task {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websiteKey")]
    pub website_key: String,
    /// Action name baked into the v3 widget, e.g. `login`
    #[serde(rename = "pageAction")]
    pub page_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// HCaptcha task fields.
#[derive(Debug, Clone, Serialize)]
pub struct HCaptchaTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websiteKey")]
    pub website_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// Geetest task fields.
#[derive(Debug, Clone, Serialize)]
pub struct GeetestTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    /// Geetest captcha id (`gt`)
    pub gt: String,
    /// v3 challenge token; absent for v4 deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// FunCaptcha (Arkose Labs) task fields.
#[derive(Debug, Clone, Serialize)]
pub struct FuncaptchaTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websitePublicKey")]
    pub website_public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// MtCaptcha task fields.
#[derive(Debug, Clone, Serialize)]
pub struct MtCaptchaTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websiteKey")]
    pub website_key: String,
    pub proxy: String,
}

/// Datadome slider task fields.
#[derive(Debug, Clone, Serialize)]
pub struct DatadomeSliderTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "captchaUrl")]
    pub captcha_url: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    pub proxy: String,
}

/// Cloudflare Turnstile task fields.
#[derive(Debug, Clone, Serialize)]
pub struct AntiTurnstileTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(rename = "websiteKey")]
    pub website_key: String,
}

/// One captcha-solving task, tagged with its type on the wire.
///
/// Serializes to the flat `task` object of a `createTask` request, with the
/// variant name in the `type` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CaptchaTask {
    #[serde(rename = "ImageToTextTask")]
    ImageToText(ImageToTextTask),
    #[serde(rename = "ReCaptchaV2Task")]
    ReCaptchaV2(ReCaptchaV2Task),
    #[serde(rename = "ReCaptchaV2TaskProxyLess")]
    ReCaptchaV2ProxyLess(ReCaptchaV2Task),
    #[serde(rename = "ReCaptchaV2EnterpriseTask")]
    ReCaptchaV2Enterprise(ReCaptchaV2Task),
    #[serde(rename = "ReCaptchaV2EnterpriseTaskProxyless")]
    ReCaptchaV2EnterpriseProxyless(ReCaptchaV2Task),
    #[serde(rename = "ReCaptchaV3Task")]
    ReCaptchaV3(ReCaptchaV3Task),
    #[serde(rename = "ReCaptchaV3TaskProxyless")]
    ReCaptchaV3Proxyless(ReCaptchaV3Task),
    #[serde(rename = "HCaptchaTask")]
    HCaptcha(HCaptchaTask),
    #[serde(rename = "HCaptchaTaskProxyless")]
    HCaptchaProxyless(HCaptchaTask),
    #[serde(rename = "GeetestTask")]
    Geetest(GeetestTask),
    #[serde(rename = "GeetestTaskProxyless")]
    GeetestProxyless(GeetestTask),
    #[serde(rename = "FuncaptchaTask")]
    Funcaptcha(FuncaptchaTask),
    #[serde(rename = "FuncaptchaTaskProxyless")]
    FuncaptchaProxyless(FuncaptchaTask),
    #[serde(rename = "MtCaptchaTask")]
    MtCaptcha(MtCaptchaTask),
    #[serde(rename = "DatadomeSliderTask")]
    DatadomeSlider(DatadomeSliderTask),
    #[serde(rename = "AntiTurnstileTaskProxyLess")]
    AntiTurnstileProxyLess(AntiTurnstileTask),
}

impl CaptchaTask {
    /// The discriminator of this task.
    pub fn captcha_type(&self) -> CaptchaType {
        match self {
            CaptchaTask::ImageToText(_) => CaptchaType::ImageToTextTask,
            CaptchaTask::ReCaptchaV2(_) => CaptchaType::ReCaptchaV2Task,
            CaptchaTask::ReCaptchaV2ProxyLess(_) => CaptchaType::ReCaptchaV2TaskProxyLess,
            CaptchaTask::ReCaptchaV2Enterprise(_) => CaptchaType::ReCaptchaV2EnterpriseTask,
            CaptchaTask::ReCaptchaV2EnterpriseProxyless(_) => {
                CaptchaType::ReCaptchaV2EnterpriseTaskProxyless
            }
            CaptchaTask::ReCaptchaV3(_) => CaptchaType::ReCaptchaV3Task,
            CaptchaTask::ReCaptchaV3Proxyless(_) => CaptchaType::ReCaptchaV3TaskProxyless,
            CaptchaTask::HCaptcha(_) => CaptchaType::HCaptchaTask,
            CaptchaTask::HCaptchaProxyless(_) => CaptchaType::HCaptchaTaskProxyless,
            CaptchaTask::Geetest(_) => CaptchaType::GeetestTask,
            CaptchaTask::GeetestProxyless(_) => CaptchaType::GeetestTaskProxyless,
            CaptchaTask::Funcaptcha(_) => CaptchaType::FuncaptchaTask,
            CaptchaTask::FuncaptchaProxyless(_) => CaptchaType::FuncaptchaTaskProxyless,
            CaptchaTask::MtCaptcha(_) => CaptchaType::MtCaptchaTask,
            CaptchaTask::DatadomeSlider(_) => CaptchaType::DatadomeSliderTask,
            CaptchaTask::AntiTurnstileProxyLess(_) => CaptchaType::AntiTurnstileTaskProxyLess,
        }
    }

    /// Builds a task from a discriminator and a flat field map, validating
    /// the required fields for that type.
    ///
    /// Field keys use the wire names (`websiteURL`, `websiteKey`, ...).
    pub fn from_parts(captcha_type: CaptchaType, fields: Map<String, Value>) -> Result<Self> {
        let mut fields = fields;
        let f = &mut fields;
        let ty = captcha_type.as_str();

        let task = match captcha_type {
            CaptchaType::ImageToTextTask => CaptchaTask::ImageToText(ImageToTextTask {
                body: take_string(ty, f, "body")?,
                module: take_opt_string(f, "module"),
            }),
            CaptchaType::ReCaptchaV2Task
            | CaptchaType::ReCaptchaV2TaskProxyLess
            | CaptchaType::ReCaptchaV2EnterpriseTask
            | CaptchaType::ReCaptchaV2EnterpriseTaskProxyless => {
                let inner = ReCaptchaV2Task {
                    website_url: take_string(ty, f, "websiteURL")?,
                    website_key: take_string(ty, f, "websiteKey")?,
                    is_invisible: f.remove("isInvisible").and_then(|v| v.as_bool()),
                    enterprise_payload: f.remove("enterprisePayload"),
                    proxy: take_proxy(captcha_type, f)?,
                };
                match captcha_type {
                    CaptchaType::ReCaptchaV2Task => CaptchaTask::ReCaptchaV2(inner),
                    CaptchaType::ReCaptchaV2TaskProxyLess => {
                        CaptchaTask::ReCaptchaV2ProxyLess(inner)
                    }
                    CaptchaType::ReCaptchaV2EnterpriseTask => {
                        CaptchaTask::ReCaptchaV2Enterprise(inner)
                    }
                    _ => CaptchaTask::ReCaptchaV2EnterpriseProxyless(inner),
                }
            }
            CaptchaType::ReCaptchaV3Task | CaptchaType::ReCaptchaV3TaskProxyless => {
                let inner = ReCaptchaV3Task {
                    website_url: take_string(ty, f, "websiteURL")?,
                    website_key: take_string(ty, f, "websiteKey")?,
                    page_action: take_string(ty, f, "pageAction")?,
                    proxy: take_proxy(captcha_type, f)?,
                };
                if captcha_type == CaptchaType::ReCaptchaV3Task {
                    CaptchaTask::ReCaptchaV3(inner)
                } else {
                    CaptchaTask::ReCaptchaV3Proxyless(inner)
                }
            }
            CaptchaType::HCaptchaTask | CaptchaType::HCaptchaTaskProxyless => {
                let inner = HCaptchaTask {
                    website_url: take_string(ty, f, "websiteURL")?,
                    website_key: take_string(ty, f, "websiteKey")?,
                    proxy: take_proxy(captcha_type, f)?,
                };
                if captcha_type == CaptchaType::HCaptchaTask {
                    CaptchaTask::HCaptcha(inner)
                } else {
                    CaptchaTask::HCaptchaProxyless(inner)
                }
            }
            CaptchaType::GeetestTask | CaptchaType::GeetestTaskProxyless => {
                let inner = GeetestTask {
                    website_url: take_string(ty, f, "websiteURL")?,
                    gt: take_string(ty, f, "gt")?,
                    challenge: take_opt_string(f, "challenge"),
                    proxy: take_proxy(captcha_type, f)?,
                };
                if captcha_type == CaptchaType::GeetestTask {
                    CaptchaTask::Geetest(inner)
                } else {
                    CaptchaTask::GeetestProxyless(inner)
                }
            }
            CaptchaType::FuncaptchaTask | CaptchaType::FuncaptchaTaskProxyless => {
                let inner = FuncaptchaTask {
                    website_url: take_string(ty, f, "websiteURL")?,
                    website_public_key: take_string(ty, f, "websitePublicKey")?,
                    proxy: take_proxy(captcha_type, f)?,
                };
                if captcha_type == CaptchaType::FuncaptchaTask {
                    CaptchaTask::Funcaptcha(inner)
                } else {
                    CaptchaTask::FuncaptchaProxyless(inner)
                }
            }
            CaptchaType::MtCaptchaTask => CaptchaTask::MtCaptcha(MtCaptchaTask {
                website_url: take_string(ty, f, "websiteURL")?,
                website_key: take_string(ty, f, "websiteKey")?,
                proxy: take_string(ty, f, "proxy")?,
            }),
            CaptchaType::DatadomeSliderTask => CaptchaTask::DatadomeSlider(DatadomeSliderTask {
                website_url: take_string(ty, f, "websiteURL")?,
                captcha_url: take_string(ty, f, "captchaUrl")?,
                user_agent: take_string(ty, f, "userAgent")?,
                proxy: take_string(ty, f, "proxy")?,
            }),
            CaptchaType::AntiTurnstileTaskProxyLess => {
                CaptchaTask::AntiTurnstileProxyLess(AntiTurnstileTask {
                    website_url: take_string(ty, f, "websiteURL")?,
                    website_key: take_string(ty, f, "websiteKey")?,
                })
            }
        };

        Ok(task)
    }

    /// Serializes this task into the `task` object of a `createTask` body.
    pub(crate) fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn take_string(
    captcha_type: &'static str,
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<String> {
    match fields.remove(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(SolverError::MissingField {
            captcha_type,
            field,
        }),
    }
}

fn take_opt_string(fields: &mut Map<String, Value>, field: &str) -> Option<String> {
    match fields.remove(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn take_proxy(captcha_type: CaptchaType, fields: &mut Map<String, Value>) -> Result<Option<String>> {
    if captcha_type.requires_proxy() {
        Ok(Some(take_string(captcha_type.as_str(), fields, "proxy")?))
    } else {
        Ok(take_opt_string(fields, "proxy"))
    }
}
