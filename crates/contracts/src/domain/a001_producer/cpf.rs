//! CPF (Brazilian individual taxpayer number) checks

/// Strip everything but digits
pub fn digits(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `true` when the CPF has 11 digits, is not a repeated digit and both check digits match
pub fn is_valid(cpf: &str) -> bool {
    let d: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != 11 || cpf.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }
    check_digit(&d[..9]) == d[9] && check_digit(&d[..10]) == d[10]
}

fn check_digit(body: &[u32]) -> u32 {
    let weight_start = body.len() as u32 + 1;
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, &x)| x * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}

/// `52998224725` -> `529.982.247-25`. Input without 11 digits is returned trimmed.
pub fn format(cpf: &str) -> String {
    let d = digits(cpf);
    if d.len() != 11 {
        return cpf.trim().to_string();
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

/// Validation message for the form, `Ok` for a valid CPF
pub fn validate(cpf: &str) -> Result<(), String> {
    if cpf.trim().is_empty() {
        return Err("CPF é obrigatório".to_string());
    }
    if digits(cpf).len() != 11 {
        return Err("CPF deve ter 11 dígitos".to_string());
    }
    if !is_valid(cpf) {
        return Err("CPF inválido".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        assert!(is_valid("52998224725"));
        assert!(is_valid("529.982.247-25"));
    }

    #[test]
    fn test_invalid_cpf() {
        assert!(!is_valid("52998224724"));
        assert!(!is_valid("11111111111"));
        assert!(!is_valid("5299822472"));
        assert!(!is_valid("5299822472a5"));
    }

    #[test]
    fn test_format() {
        assert_eq!(format("52998224725"), "529.982.247-25");
        assert_eq!(format(" 123 "), "123");
    }

    #[test]
    fn test_validate_messages() {
        assert_eq!(validate(""), Err("CPF é obrigatório".to_string()));
        assert_eq!(validate("123"), Err("CPF deve ter 11 dígitos".to_string()));
        assert_eq!(validate("52998224724"), Err("CPF inválido".to_string()));
        assert!(validate("529.982.247-25").is_ok());
    }
}
