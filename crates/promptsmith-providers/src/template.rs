//! Instruction template rendering.

/// Built-in instruction: asks for exactly 5 prompts, one per line, unnumbered.
pub const DEFAULT_TEMPLATE: &str = "Вы — эксперт по созданию промптов для AI-ассистентов.

Описание бизнеса: {business}
Роль сотрудника: {role}

Ваша задача — создать 5 полезных промптов для сотрудника с указанной ролью.

Каждый промпт должен:
1. Быть конкретным и применимым к описанному бизнесу
2. Начинаться с обращения к AI (например, \"Помоги мне...\", \"Составь...\", \"Проанализируй...\")
3. Содержать контекст бизнеса и роли
4. Быть готовым к использованию без дополнительной модификации
5. Быть достаточно длинным и детальным (минимум 2-3 предложения)

Формат ответа — только список промптов, каждый с новой строки, без нумерации и лишнего текста.";

/// Fixed user message; everything else lives in the instruction.
pub const USER_MESSAGE: &str = "Сгенерируй промпты согласно инструкциям.";

/// Substitute `{role}` then `{business}` into `template`, or into
/// [`DEFAULT_TEMPLATE`] when `template` is empty.
///
/// Substitution is sequential and unescaped: a `{business}` token inside the
/// role value is itself replaced in the second pass.
pub fn render(template: &str, role: &str, business: &str) -> String {
    let template = if template.is_empty() {
        DEFAULT_TEMPLATE
    } else {
        template
    };
    template.replace("{role}", role).replace("{business}", business)
}
