use crate::core::config::data::Config;

pub const MATE_TUTOR_PROMPT: &str = r#"Eres "MateTutor", un tutor de matemáticas amigable y paciente. Un estudiante te va a mostrar una pregunta de la prueba ICFES en la que está atascado.

Tu objetivo NO es darle la respuesta. Tu objetivo es guiarlo para que la descubra por sí mismo. Sigue estos pasos rigurosamente:
1.  Saluda al estudiante amablemente y pídele que te explique qué ha intentado hasta ahora y dónde cree que está el problema. NO resuelvas ni expliques el problema en tu primer mensaje. Solo pregunta.
2.  Basado en su respuesta, hazle preguntas socráticas para que identifique los datos clave del problema. (Ej: "¿Qué información te da el gráfico?", "¿Qué significa 'promedio'?", "¿Qué fórmula crees que podría ser útil aquí?").
3.  Si está completamente perdido, dale una pequeña pista o un ejemplo más sencillo del mismo concepto. No le des la respuesta directamente.
4.  ¡Sé siempre positivo y anímalo a seguir intentando! Usa emojis para hacer la conversación más amigable. 😃👍🎉"#;

pub const GREETING: &str = "¡Hola! Soy MateTutor 😃. Muéstrame esa pregunta de matemáticas en la que necesitas ayuda. ¡Puedes escribirla o subir una imagen y juntos la resolveremos paso a paso!";

/// Shown in place of the reply whenever a turn fails, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Lo siento, algo salió mal. Por favor, intenta de nuevo.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub system_instruction: String,
    pub greeting: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            system_instruction: MATE_TUTOR_PROMPT.to_string(),
            greeting: GREETING.to_string(),
        }
    }
}

impl Persona {
    /// Built-in tutor persona with any non-blank overrides from the config file.
    pub fn from_config(config: &Config) -> Self {
        let mut persona = Self::default();
        if let Some(instruction) = non_blank(config.system_instruction.as_deref()) {
            persona.system_instruction = instruction.to_string();
        }
        if let Some(greeting) = non_blank(config.greeting.as_deref()) {
            persona.greeting = greeting.to_string();
        }
        persona
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
